use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use installer_shim::errors::{Result, ShimError};
use installer_shim::exec::{answers_payload, InstallerBackend, InstallerProcess};

/// What the fake installer does once launched.
#[derive(Debug, Clone)]
pub struct FakeScript {
    pub lines: Vec<String>,
    pub exit_code: i32,
    pub fail_launch: bool,
}

impl FakeScript {
    pub fn new(lines: &[&str], exit_code: i32) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            exit_code,
            fail_launch: false,
        }
    }

    /// A script whose launch fails as if the executable were missing.
    pub fn missing() -> Self {
        Self {
            lines: Vec::new(),
            exit_code: 0,
            fail_launch: true,
        }
    }
}

/// A fake installer backend that:
/// - records the stdin payload of every launch
/// - replays a fixed list of output lines and exit code
/// - optionally holds `wait()` until [`FakeInstaller::release`] is called,
///   keeping the run in progress for as long as a test needs.
#[derive(Clone)]
pub struct FakeInstaller {
    script: FakeScript,
    payloads: Arc<Mutex<Vec<String>>>,
    lines_read: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
}

impl FakeInstaller {
    pub fn new(script: FakeScript) -> Self {
        Self {
            script,
            payloads: Arc::new(Mutex::new(Vec::new())),
            lines_read: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    /// Same script, but each run blocks in `wait()` until released.
    pub fn gated(script: FakeScript) -> Self {
        Self {
            gate: Some(Arc::new(Notify::new())),
            ..Self::new(script)
        }
    }

    /// Let a gated run exit.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Stdin payloads of every launch so far.
    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }

    pub fn launches(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    /// Output lines handed to the runner so far, across all runs.
    pub fn lines_read(&self) -> usize {
        self.lines_read.load(Ordering::SeqCst)
    }
}

impl InstallerBackend for FakeInstaller {
    fn spawn(
        &self,
        answers: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn InstallerProcess>>> + Send + '_>> {
        Box::pin(async move {
            self.payloads
                .lock()
                .unwrap()
                .push(answers_payload(&answers));

            if self.script.fail_launch {
                return Err(ShimError::Launch {
                    program: "./fake-installer.sh".into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
                });
            }

            let process: Box<dyn InstallerProcess> = Box::new(FakeProcess {
                lines: self.script.lines.iter().cloned().collect(),
                exit_code: self.script.exit_code,
                lines_read: Arc::clone(&self.lines_read),
                gate: self.gate.clone(),
            });
            Ok(process)
        })
    }
}

struct FakeProcess {
    lines: VecDeque<String>,
    exit_code: i32,
    lines_read: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
}

impl InstallerProcess for FakeProcess {
    fn next_line(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>> {
        let line = self.lines.pop_front();
        if line.is_some() {
            self.lines_read.fetch_add(1, Ordering::SeqCst);
        }
        Box::pin(async move { Ok(line) })
    }

    fn wait(self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<i32>> + Send>> {
        Box::pin(async move {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(self.exit_code)
        })
    }
}
