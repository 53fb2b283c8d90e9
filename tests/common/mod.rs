#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use anyhow::{bail, Result};
use devboot::{
    config::{Settings, TargetKind},
    printer::Console,
    process::{CommandSpec, Launcher},
};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Run(Vec<String>),
    Browser(String),
}

/// Records every call with the (tokio) time it happened.
pub struct FakeLauncher {
    pub calls: Mutex<Vec<(Call, Instant)>>,
    pub install_code: Option<i32>,
    pub launch_code: Option<i32>,
    /// How long the launched process "runs".
    pub launch_hold: Duration,
    pub browser_fails: bool,
}

impl Default for FakeLauncher {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            install_code: Some(0),
            launch_code: Some(0),
            launch_hold: Duration::ZERO,
            browser_fails: false,
        }
    }
}

impl FakeLauncher {
    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((call, Instant::now()));
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.timed_calls().into_iter().map(|(c, _)| c).collect()
    }

    pub fn timed_calls(&self) -> Vec<(Call, Instant)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Launcher for FakeLauncher {
    async fn run(&self, spec: &CommandSpec) -> Result<Option<i32>> {
        let args = spec.arg_strings();
        let is_install = args.get(1).map(String::as_str) == Some("pip");
        self.record(Call::Run(args));
        if is_install {
            return Ok(self.install_code);
        }
        tokio::time::sleep(self.launch_hold).await;
        Ok(self.launch_code)
    }

    fn open_browser(&self, url: &str) -> Result<()> {
        self.record(Call::Browser(url.to_string()));
        if self.browser_fails {
            bail!("no browser available");
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingConsole {
    pub messages: RefCell<Vec<String>>,
    pub paused: Cell<bool>,
}

impl Console for RecordingConsole {
    fn failure(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn pause(&self) {
        self.paused.set(true);
    }
}

/// A file that stands in for the interpreter; only its existence matters.
pub fn fake_python(dir: &Path) -> PathBuf {
    let path = dir.join(if cfg!(windows) { "python.exe" } else { "python" });
    fs::write(&path, b"").ok();
    path
}

pub fn settings(python: PathBuf) -> Settings {
    Settings {
        python_path: python,
        default_target: TargetKind::Web,
        webapp_script: "app.py".into(),
        webapp_dependencies: vec!["streamlit".into(), "pandas".into()],
        static_dependencies: vec!["streamlit".into(), "pandas".into()],
        static_port: 8000,
        static_root: ".".into(),
        browser_delay: Duration::from_secs(2),
        open_browser: true,
        pause_on_failure: true,
        log_level: "info".into(),
    }
}
