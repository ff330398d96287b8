// src/exec/script.rs

//! Installer backend that runs a real executable.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{Result, ShimError};

use super::backend::{answers_payload, InstallerBackend, InstallerProcess};

/// Buffered output lines between the pipe readers and the runner.
const LINE_CHANNEL_CAPACITY: usize = 64;

/// Launches the installer executable at `program`.
///
/// Relative paths are resolved against the current working directory, never
/// looked up on `PATH`.
#[derive(Debug, Clone)]
pub struct ScriptInstaller {
    program: PathBuf,
}

impl ScriptInstaller {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn launch(&self, answers: Vec<String>) -> Result<Box<dyn InstallerProcess>> {
        let program = if self.program.is_absolute() {
            self.program.clone()
        } else {
            std::env::current_dir()?.join(&self.program)
        };

        make_executable(&program).await.map_err(|source| ShimError::Launch {
            program: program.clone(),
            source,
        })?;

        info!(program = %program.display(), answers = answers.len(), "starting installer process");

        let mut child = Command::new(&program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ShimError::Launch {
                program: program.clone(),
                source,
            })?;

        let (tx, rx) = mpsc::channel::<String>(LINE_CHANNEL_CAPACITY);
        if let Some(stdout) = child.stdout.take() {
            spawn_line_reader(stdout, "stdout", tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_line_reader(stderr, "stderr", tx.clone());
        }
        drop(tx);

        if let Some(stdin) = child.stdin.take() {
            spawn_answer_writer(stdin, answers_payload(&answers));
        }

        Ok(Box::new(ScriptProcess { child, lines: rx }))
    }
}

impl InstallerBackend for ScriptInstaller {
    fn spawn(
        &self,
        answers: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn InstallerProcess>>> + Send + '_>> {
        Box::pin(self.launch(answers))
    }
}

/// A running installer child process.
struct ScriptProcess {
    child: Child,
    lines: mpsc::Receiver<String>,
}

impl InstallerProcess for ScriptProcess {
    fn next_line(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>> {
        Box::pin(async move { Ok(self.lines.recv().await) })
    }

    fn wait(self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<i32>> + Send>> {
        let ScriptProcess { mut child, lines } = *self;
        // Readers keep draining into the void once the receiver is gone.
        drop(lines);

        Box::pin(async move {
            let status = child.wait().await?;
            let code = status.code().unwrap_or(-1);
            info!(exit_code = code, success = status.success(), "installer process exited");
            Ok(code)
        })
    }
}

#[cfg(unix)]
async fn make_executable(program: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(program, std::fs::Permissions::from_mode(0o755)).await
}

#[cfg(not(unix))]
async fn make_executable(program: &Path) -> std::io::Result<()> {
    tokio::fs::metadata(program).await.map(|_| ())
}

/// Write the answers to the installer's stdin, then close it.
///
/// Runs apart from the output readers and the runner, so an installer that
/// prints a lot before (or instead of) reading its input never stalls `spawn`.
fn spawn_answer_writer(mut stdin: ChildStdin, payload: String) {
    tokio::spawn(async move {
        if let Err(e) = stdin.write_all(payload.as_bytes()).await {
            warn!(error = %e, "failed to write answers to installer stdin");
        } else if let Err(e) = stdin.shutdown().await {
            debug!(error = %e, "closing installer stdin failed");
        }
        // Dropping the handle closes the pipe: the installer sees EOF.
    });
}

/// Forward every line of `stream` to `tx`.
///
/// Once the receiver is dropped the reader keeps consuming (and discarding)
/// output until EOF, so the installer is never stalled on a full pipe.
fn spawn_line_reader<R>(stream: R, source: &'static str, tx: mpsc::Sender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        let mut forwarding = true;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf)
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    debug!(source, "installer output: {}", line);

                    if forwarding && tx.send(line).await.is_err() {
                        debug!(source, "output consumer gone; discarding remaining output");
                        forwarding = false;
                    }
                }
                Err(e) => {
                    warn!(source, error = %e, "reading installer output failed");
                    break;
                }
            }
        }

        debug!(source, "installer output stream ended");
    });
}
