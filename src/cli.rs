use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::config::TargetKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "devboot", about = "Install dependencies and launch the dashboard or a static file server", version)]
#[command(group(ArgGroup::new("shortcut").args(["dry_run", "show_config", "init_config"]).multiple(false)))]
pub struct Cli {
    /// What to launch; defaults to DEFAULT_TARGET from the config.
    #[arg(value_enum, value_name = "TARGET")]
    pub target: Option<TargetKind>,

    /// Python interpreter to use (overrides PYTHON_PATH).
    #[arg(long)]
    pub python: Option<PathBuf>,

    /// Port for the static file server (overrides STATIC_PORT).
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory served by the static file server (overrides STATIC_ROOT).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Streamlit script to run (overrides WEBAPP_SCRIPT).
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Do not open a browser for the static file server.
    #[arg(long = "no-browser")]
    pub no_browser: bool,

    /// Exit immediately on failure instead of waiting for Enter.
    #[arg(long = "no-pause")]
    pub no_pause: bool,

    /// Print the steps that would run, then exit.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the effective settings as JSON, then exit.
    #[arg(long = "show-config")]
    pub show_config: bool,

    /// Write a default config file, then exit.
    #[arg(long = "init-config")]
    pub init_config: bool,

    /// Debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Fold explicit flags into the loaded config so they win over rc and env.
    pub fn apply(&self, cfg: &mut crate::config::Config) {
        if let Some(p) = &self.python {
            cfg.set("PYTHON_PATH", p.to_string_lossy());
        }
        if let Some(port) = self.port {
            cfg.set("STATIC_PORT", port.to_string());
        }
        if let Some(root) = &self.root {
            cfg.set("STATIC_ROOT", root.to_string_lossy());
        }
        if let Some(script) = &self.script {
            cfg.set("WEBAPP_SCRIPT", script.to_string_lossy());
        }
        if self.no_browser {
            cfg.set("OPEN_BROWSER", "false");
        }
        if self.no_pause {
            cfg.set("PAUSE_ON_FAILURE", "false");
        }
    }
}
