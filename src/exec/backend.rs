// src/exec/backend.rs

//! Pluggable installer backend abstraction.
//!
//! The runner talks to an `InstallerBackend` instead of spawning processes
//! itself. This makes it easy to swap in a scripted fake in tests while
//! keeping the production implementation in [`script`](super::script).
//!
//! - `ScriptInstaller` is the default implementation: it launches the real
//!   installer executable.
//! - Tests provide their own backend that, for example, replays a fixed
//!   list of output lines and exit code without touching the OS.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

/// Trait abstracting how the installer is launched.
pub trait InstallerBackend: Send + Sync {
    /// Launch the installer and feed it `answers`.
    ///
    /// Implementations write [`answers_payload`] to the installer's input and
    /// close it before returning the running process.
    fn spawn(
        &self,
        answers: Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<Box<dyn InstallerProcess>>> + Send + '_>>;
}

/// A running installer.
///
/// The output is a lazy, finite, non-restartable sequence of lines.
pub trait InstallerProcess: Send {
    /// Next line of combined output, `None` once the output is exhausted.
    fn next_line(&mut self) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + '_>>;

    /// Stop reading output and wait for the process to exit.
    ///
    /// Returns the exit code; `-1` if the process was terminated by a signal.
    fn wait(self: Box<Self>) -> Pin<Box<dyn Future<Output = Result<i32>> + Send>>;
}

/// Bytes written to the installer's stdin: one answer per line, with a
/// trailing newline.
pub fn answers_payload(answers: &[String]) -> String {
    let mut payload = answers.join("\n");
    payload.push('\n');
    payload
}
