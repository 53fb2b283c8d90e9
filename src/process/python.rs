//! Python interpreter lookup and the command lines run through it.

use std::{
    env,
    path::{Path, PathBuf},
};

use super::CommandSpec;

/// Locate the interpreter. Paths with a directory component must exist as
/// given; a bare program name is looked up on `PATH`.
pub fn resolve_interpreter(configured: &Path) -> Option<PathBuf> {
    let path_var = env::var_os("PATH").unwrap_or_default();
    let exts = executable_extensions();
    resolve_in(configured, env::split_paths(&path_var), &exts)
}

pub fn resolve_in<I>(configured: &Path, search: I, exts: &[String]) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    if configured.as_os_str().is_empty() {
        return None;
    }
    if configured.components().count() > 1 || configured.is_absolute() {
        return configured.is_file().then(|| configured.to_path_buf());
    }
    for dir in search {
        let candidate = dir.join(configured);
        if candidate.is_file() {
            return Some(candidate);
        }
        for ext in exts {
            let mut name = configured.as_os_str().to_owned();
            name.push(ext);
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

fn executable_extensions() -> Vec<String> {
    if cfg!(windows) {
        env::var("PATHEXT")
            .unwrap_or_else(|_| ".EXE;.BAT;.CMD".into())
            .split(';')
            .filter(|e| !e.is_empty())
            .map(str::to_ascii_lowercase)
            .collect()
    } else {
        Vec::new()
    }
}

/// `python -m pip install` for the given packages. No upgrade flag: an
/// already satisfied set is a no-op.
pub fn pip_install(python: &Path, packages: &[String]) -> CommandSpec {
    CommandSpec::new(python)
        .args(["-m", "pip", "install", "--disable-pip-version-check"])
        .args(packages.iter().cloned())
}

pub fn streamlit_run(python: &Path, script: &Path) -> CommandSpec {
    CommandSpec::new(python)
        .args(["-m", "streamlit", "run"])
        .arg(script.as_os_str())
}

pub fn http_server(python: &Path, port: u16, root: &Path) -> CommandSpec {
    CommandSpec::new(python)
        .args(["-m", "http.server"])
        .arg(port.to_string())
        .current_dir(root)
}
