// src/engine/runner.rs

//! Installation runner: drives one installer process and mirrors its output
//! into the progress store.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::InstallerConfig;
use crate::exec::{InstallerBackend, InstallerProcess};
use crate::state::{ProgressStore, PROGRESS_DONE, SUCCESS_STATUS};

/// Tunables for how output is turned into progress.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Pause after each regular output line, throttling store updates.
    pub line_delay: Duration,
    /// Substring that marks a fatal line and stops output processing.
    pub error_marker: String,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            line_delay: Duration::from_millis(100),
            error_marker: "ERROR".to_string(),
        }
    }
}

impl From<&InstallerConfig> for RunnerOptions {
    fn from(cfg: &InstallerConfig) -> Self {
        Self {
            line_delay: cfg.line_delay,
            error_marker: cfg.error_marker.clone(),
        }
    }
}

/// How a run ended, as seen by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The installer could not be launched at all.
    LaunchFailed(String),
    /// The installer exited with `code`; `error_status` holds the
    /// `"Error: ..."` status if an error line cut output processing short.
    Exited {
        code: i32,
        error_status: Option<String>,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Exited { code: 0, .. })
    }
}

pub struct InstallationRunner {
    backend: Arc<dyn InstallerBackend>,
    store: ProgressStore,
    options: RunnerOptions,
}

impl InstallationRunner {
    pub fn new(
        backend: Arc<dyn InstallerBackend>,
        store: ProgressStore,
        options: RunnerOptions,
    ) -> Self {
        Self {
            backend,
            store,
            options,
        }
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// Reset the store right away, then run the installation on a background
    /// task.
    ///
    /// The reset happens before this returns, so an observer polling after
    /// the call never sees the previous run's final state.
    pub fn start(self: &Arc<Self>, answers: Vec<String>) -> JoinHandle<RunOutcome> {
        self.store.reset_for_run();
        let runner = Arc::clone(self);
        tokio::spawn(async move { runner.execute(answers).await })
    }

    /// Run one installation to completion on the current task.
    pub async fn run(&self, answers: Vec<String>) -> RunOutcome {
        self.store.reset_for_run();
        self.execute(answers).await
    }

    async fn execute(&self, answers: Vec<String>) -> RunOutcome {
        info!(answers = answers.len(), "installation run started");

        let mut process = match self.backend.spawn(answers).await {
            Ok(process) => process,
            Err(err) => {
                error!(error = %err, "installer could not be started");
                self.store
                    .finish(format!("Installation failed to start: {err}"), None);
                return RunOutcome::LaunchFailed(err.to_string());
            }
        };

        let error_status = self.consume_output(process.as_mut()).await;

        let code = match process.wait().await {
            Ok(code) => code,
            Err(err) => {
                warn!(error = %err, "waiting for installer failed; treating as exit code -1");
                -1
            }
        };

        if code == 0 {
            self.store
                .finish(SUCCESS_STATUS.to_string(), Some(PROGRESS_DONE));
        } else {
            let mut status = format!("Installation failed with return code {code}");
            if let Some(error_status) = &error_status {
                status.push_str(": ");
                status.push_str(error_status);
            }
            self.store.finish(status, None);
        }

        info!(exit_code = code, "installation run finished");
        RunOutcome::Exited { code, error_status }
    }

    /// Translate output lines into progress until the output ends or an error
    /// line is seen. Returns the error status in the latter case.
    async fn consume_output(&self, process: &mut dyn InstallerProcess) -> Option<String> {
        loop {
            let line = match process.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!("installer output exhausted");
                    return None;
                }
                Err(err) => {
                    warn!(error = %err, "reading installer output failed; waiting for exit");
                    return None;
                }
            };

            let trimmed = line.trim();

            if line.contains(self.options.error_marker.as_str()) {
                let status = format!("Error: {trimmed}");
                warn!(line = %trimmed, "installer reported an error; ignoring further output");
                self.store.set_status(status.clone());
                return Some(status);
            }

            self.store.record_line(trimmed.to_string());

            if !self.options.line_delay.is_zero() {
                sleep(self.options.line_delay).await;
            }
        }
    }
}
