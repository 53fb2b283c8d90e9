//! Child process management: command specs and the launcher seam.

use std::{
    ffi::OsString,
    fmt,
    future::Future,
    path::PathBuf,
    process::Stdio,
};

use anyhow::{Context, Result};
use tokio::process::Command;

pub mod browser;
pub mod python;

/// A program plus arguments, optionally run from a specific directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: None }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Arguments as lossy strings, for matching in logs and tests.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for a in &self.args {
            write!(f, " {}", quote(&a.to_string_lossy()))?;
        }
        if let Some(dir) = &self.cwd {
            write!(f, " (in {})", dir.display())?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    if s.is_empty() || s.contains(char::is_whitespace) {
        format!("\"{}\"", s)
    } else {
        s.to_string()
    }
}

/// Everything the bootstrapper does to the outside world goes through here.
/// `run` futures are `Send`, so a bootstrap run can live on a spawned task.
pub trait Launcher: Send + Sync + 'static {
    /// Run `spec` in the foreground until it exits. `None` means the process
    /// ended without an exit code (e.g. killed by a signal).
    fn run(&self, spec: &CommandSpec) -> impl Future<Output = Result<Option<i32>>> + Send;

    /// Ask the OS to open `url` in the default browser. Does not wait for it.
    fn open_browser(&self, url: &str) -> Result<()>;
}

/// Real processes, inheriting this console's stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    async fn run(&self, spec: &CommandSpec) -> Result<Option<i32>> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        let status = cmd
            .status()
            .await
            .with_context(|| format!("failed to start {}", spec))?;
        Ok(status.code())
    }

    fn open_browser(&self, url: &str) -> Result<()> {
        let spec = browser::open_command(url);
        let mut cmd = std::process::Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd.spawn()
            .with_context(|| format!("failed to launch browser via {}", spec))?;
        Ok(())
    }
}
