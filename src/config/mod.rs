use std::{
    collections::{BTreeMap, HashMap},
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use directories::BaseDirs;
use serde::Serialize;

/// Prefix accepted on every key when read from the environment.
const ENV_PREFIX: &str = "DEVBOOT_";

const KEYS: &[&str] = &[
    "PYTHON_PATH",
    "DEFAULT_TARGET",
    "WEBAPP_SCRIPT",
    "WEBAPP_DEPENDENCIES",
    "STATIC_DEPENDENCIES",
    "STATIC_PORT",
    "STATIC_ROOT",
    "BROWSER_DELAY_MS",
    "OPEN_BROWSER",
    "PAUSE_ON_FAILURE",
    "LOG_LEVEL",
];

/// Packages the dashboard application imports. Both launch targets install
/// this set unless configured otherwise.
const DEFAULT_DEPENDENCIES: &str =
    "streamlit streamlit-option-menu pandas numpy yfinance matplotlib plotly requests statsmodels";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(default_config_path(), env::vars())
    }

    /// Defaults, then the rc file at `config_path`, then `vars` on top.
    pub fn load_from<I>(config_path: PathBuf, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(|l| l.ok()) {
                    if let Some((k, v)) = parse_line(&line) {
                        map.insert(k, v);
                    }
                }
            }
        }

        // Unprefixed keys first so DEVBOOT_* wins regardless of iteration order.
        let mut prefixed = Vec::new();
        for (k, v) in vars {
            match k.strip_prefix(ENV_PREFIX) {
                Some(rest) if !rest.is_empty() => prefixed.push((rest.to_string(), v)),
                Some(_) => {}
                None if is_config_key(&k) => {
                    map.insert(k, v);
                }
                None => {}
            }
        }
        map.extend(prefixed);

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }

    pub fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        self.get(key)
            .map(|v| {
                v.trim()
                    .parse::<u64>()
                    .with_context(|| format!("{} must be a non-negative integer, got '{}'", key, v))
            })
            .transpose()
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key).map(|v| split_list(&v)).unwrap_or_default()
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from)
    }

    /// Write a commented rc file with the built-in defaults. Refuses to
    /// overwrite an existing file.
    pub fn write_default_rc(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("config file already exists: {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let defaults: BTreeMap<_, _> = default_map().into_iter().collect();
        let mut out = String::from("# devboot configuration (KEY=VALUE, environment variables take precedence)\n");
        for key in KEYS {
            let value = defaults.get(*key).map(String::as_str).unwrap_or("");
            out.push_str(&format!("{}={}\n", key, value));
        }
        fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (k, v) = line.split_once('=')?;
    let v = v.trim();
    let v = v
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(v);
    Some((k.trim().to_string(), v.to_string()))
}

fn is_config_key(k: &str) -> bool {
    KEYS.contains(&k)
}

/// Split a dependency list on commas and whitespace, dropping empties.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("devboot").join(".devbootrc")
}

fn default_python() -> &'static str {
    if cfg!(windows) {
        "python"
    } else {
        "python3"
    }
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Paths
    m.insert("PYTHON_PATH".into(), default_python().into());
    m.insert("WEBAPP_SCRIPT".into(), "app.py".into());
    m.insert("STATIC_ROOT".into(), ".".into());

    // Lists
    m.insert("WEBAPP_DEPENDENCIES".into(), DEFAULT_DEPENDENCIES.into());
    m.insert("STATIC_DEPENDENCIES".into(), DEFAULT_DEPENDENCIES.into());

    // Numbers
    m.insert("STATIC_PORT".into(), "8000".into());
    m.insert("BROWSER_DELAY_MS".into(), "2000".into());

    // Strings
    m.insert("DEFAULT_TARGET".into(), "web".into());
    m.insert("LOG_LEVEL".into(), "info".into());

    // Bools as strings
    m.insert("OPEN_BROWSER".into(), "true".into());
    m.insert("PAUSE_ON_FAILURE".into(), "true".into());

    m
}

/// Which front-end the bootstrapper starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Streamlit web application.
    Web,
    /// Built-in static file server.
    Static,
}

impl std::str::FromStr for TargetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" | "webapp" | "streamlit" => Ok(Self::Web),
            "static" | "http" | "server" => Ok(Self::Static),
            other => Err(anyhow!("unknown target '{}', expected 'web' or 'static'", other)),
        }
    }
}

/// Typed view over [`Config`].
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub python_path: PathBuf,
    pub default_target: TargetKind,
    pub webapp_script: PathBuf,
    pub webapp_dependencies: Vec<String>,
    pub static_dependencies: Vec<String>,
    pub static_port: u16,
    pub static_root: PathBuf,
    #[serde(serialize_with = "serialize_millis")]
    pub browser_delay: Duration,
    pub open_browser: bool,
    pub pause_on_failure: bool,
    pub log_level: String,
}

impl Settings {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let python_path = cfg
            .get_path("PYTHON_PATH")
            .ok_or_else(|| anyhow!("PYTHON_PATH must not be empty"))?;
        let default_target = cfg
            .get("DEFAULT_TARGET")
            .unwrap_or_else(|| "web".into())
            .parse::<TargetKind>()
            .context("invalid DEFAULT_TARGET")?;
        let port = cfg.get_u64("STATIC_PORT")?.unwrap_or(8000);
        let static_port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| anyhow!("STATIC_PORT must be between 1 and 65535, got {}", port))?;

        Ok(Self {
            python_path,
            default_target,
            webapp_script: cfg.get_path("WEBAPP_SCRIPT").unwrap_or_else(|| "app.py".into()),
            webapp_dependencies: cfg.get_list("WEBAPP_DEPENDENCIES"),
            static_dependencies: cfg.get_list("STATIC_DEPENDENCIES"),
            static_port,
            static_root: cfg.get_path("STATIC_ROOT").unwrap_or_else(|| ".".into()),
            browser_delay: Duration::from_millis(cfg.get_u64("BROWSER_DELAY_MS")?.unwrap_or(2000)),
            open_browser: cfg.get_bool("OPEN_BROWSER"),
            pause_on_failure: cfg.get_bool("PAUSE_ON_FAILURE"),
            log_level: cfg.get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
        })
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
