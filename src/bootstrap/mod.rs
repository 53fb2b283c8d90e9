//! The bootstrap sequence: interpreter check, dependency install, launch.

use std::{
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    config::{Settings, TargetKind},
    process::{browser, python, CommandSpec, Launcher},
};

/// What gets launched once dependencies are in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    WebApp { script: PathBuf },
    StaticServer { port: u16, root: PathBuf, open_browser: bool },
}

impl Target {
    pub fn from_settings(kind: TargetKind, settings: &Settings) -> Self {
        match kind {
            TargetKind::Web => Self::WebApp { script: settings.webapp_script.clone() },
            TargetKind::Static => Self::StaticServer {
                port: settings.static_port,
                root: settings.static_root.clone(),
                open_browser: settings.open_browser,
            },
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Self::WebApp { .. } => TargetKind::Web,
            Self::StaticServer { .. } => TargetKind::Static,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The launched process exited nonzero. `code` is `None` when it could
    /// not be started or exited without a status code.
    Failed { code: Option<i32> },
}

/// One step of a [`Plan`], in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Install(CommandSpec),
    /// Fires on a background task after `delay`; never waited on before the
    /// next action.
    OpenBrowser { url: String, delay: Duration },
    Launch(CommandSpec),
}

#[derive(Debug, Clone)]
pub struct Plan {
    pub interpreter: PathBuf,
    pub actions: Vec<Action>,
}

pub struct Bootstrapper<L> {
    settings: Settings,
    launcher: Arc<L>,
}

impl<L: Launcher> Bootstrapper<L> {
    pub fn new(settings: Settings, launcher: Arc<L>) -> Self {
        Self { settings, launcher }
    }

    /// Check the interpreter and lay out the actions `run` would take.
    /// Fails only when the interpreter cannot be found.
    pub fn plan(&self, target: &Target) -> Result<Plan> {
        let configured = &self.settings.python_path;
        let Some(interpreter) = python::resolve_interpreter(configured) else {
            bail!(
                "Python interpreter not found at {}. Set PYTHON_PATH (or pass --python) to a valid interpreter.",
                configured.display()
            );
        };

        let deps = match target {
            Target::WebApp { .. } => &self.settings.webapp_dependencies,
            Target::StaticServer { .. } => &self.settings.static_dependencies,
        };
        let mut actions = vec![Action::Install(python::pip_install(&interpreter, deps))];

        match target {
            Target::WebApp { script } => {
                actions.push(Action::Launch(python::streamlit_run(&interpreter, script)));
            }
            Target::StaticServer { port, root, open_browser } => {
                if *open_browser {
                    actions.push(Action::OpenBrowser {
                        url: browser::local_url(*port),
                        delay: self.settings.browser_delay,
                    });
                }
                actions.push(Action::Launch(python::http_server(&interpreter, *port, root)));
            }
        }

        Ok(Plan { interpreter, actions })
    }

    /// Run the whole sequence. `Err` means the interpreter precondition
    /// failed and nothing was started. Only the launched process decides the
    /// outcome; an installer failure is logged and the launch goes ahead.
    pub async fn run(&self, target: &Target) -> Result<Outcome> {
        let plan = self.plan(target)?;
        info!(interpreter = %plan.interpreter.display(), target = ?target.kind(), "bootstrapping");

        let mut launch_code: Option<Option<i32>> = None;
        let mut pending_browser = None;

        for action in plan.actions {
            match action {
                Action::Install(spec) => {
                    info!("ensuring dependencies are installed");
                    match self.exec(&spec).await {
                        Some(0) => info!("dependencies ready"),
                        code => warn!(code = ?code, "dependency installation failed, launching anyway"),
                    }
                }
                Action::OpenBrowser { url, delay } => {
                    pending_browser = Some(self.schedule_browser(url, delay));
                }
                Action::Launch(spec) => {
                    info!("launching {}", spec);
                    launch_code = Some(self.exec(&spec).await);
                }
            }
        }

        // A server that dies early still gets its browser window.
        if let Some(task) = pending_browser {
            if let Err(e) = task.await {
                warn!("browser task did not complete: {}", e);
            }
        }

        let outcome = match launch_code {
            Some(Some(0)) => Outcome::Success,
            Some(code) => Outcome::Failed { code },
            None => Outcome::Failed { code: None },
        };
        info!(?outcome, "session finished");
        Ok(outcome)
    }

    /// Run a child to completion; spawn errors count as a missing code.
    async fn exec(&self, spec: &CommandSpec) -> Option<i32> {
        debug!("exec {}", spec);
        match self.launcher.run(spec).await {
            Ok(code) => code,
            Err(e) => {
                warn!("{:#}", e);
                None
            }
        }
    }

    fn schedule_browser(&self, url: String, delay: Duration) -> JoinHandle<()> {
        let launcher = Arc::clone(&self.launcher);
        debug!(%url, delay_ms = delay.as_millis() as u64, "browser open scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match launcher.open_browser(&url) {
                Ok(()) => info!(%url, "opened browser"),
                Err(e) => warn!("could not open browser at {}: {:#}", url, e),
            }
        })
    }
}
