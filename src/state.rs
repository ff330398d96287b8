// src/state.rs

//! Shared, pollable installation progress.
//!
//! The store is written by the installation runner and read by any number of
//! HTTP handlers. Every write replaces the fields it touches under a single
//! write lock and every read clones the whole snapshot under a read lock, so
//! a poller never sees a half-applied update.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

/// Status shown before the first installation has been started.
pub const WAITING_STATUS: &str = "Waiting to start...";
/// Status set at the moment a run begins.
pub const STARTING_STATUS: &str = "Starting installation...";
/// Status set when the installer exits with code 0.
pub const SUCCESS_STATUS: &str = "Installation completed successfully!";
/// Progress value reported after a successful run.
pub const PROGRESS_DONE: u32 = 100;

/// One consistent view of the installation progress.
///
/// Serialized as-is for `GET /progress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub progress: u32,
    pub status: String,
    pub complete: bool,
    pub current_prompt: Option<String>,
}

impl ProgressState {
    fn waiting(first_prompt: Option<String>) -> Self {
        Self {
            progress: 0,
            status: WAITING_STATUS.to_string(),
            complete: false,
            current_prompt: first_prompt,
        }
    }

    fn starting() -> Self {
        Self {
            progress: 0,
            status: STARTING_STATUS.to_string(),
            complete: false,
            current_prompt: None,
        }
    }
}

/// Cheaply cloneable handle to the shared progress state.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    inner: Arc<RwLock<ProgressState>>,
}

impl ProgressStore {
    /// Create the store in its "waiting" state, advertising `first_prompt`
    /// as the question the caller should answer first.
    pub fn new(first_prompt: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ProgressState::waiting(first_prompt))),
        }
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> ProgressState {
        self.read().clone()
    }

    /// Publish the prompt awaiting an answer.
    ///
    /// Ignored once the current run has completed; a new answer cycle starts
    /// with [`ProgressStore::reset_for_cycle`] instead.
    pub fn set_current_prompt(&self, prompt: Option<String>) {
        let mut state = self.write();
        if state.complete {
            return;
        }
        state.current_prompt = prompt;
    }

    /// Drop the finished run's result and go back to the "waiting" state,
    /// advertising `prompt` as the next question of the new cycle.
    pub fn reset_for_cycle(&self, prompt: Option<String>) {
        *self.write() = ProgressState::waiting(prompt);
    }

    /// Reset everything for a new run.
    pub fn reset_for_run(&self) {
        *self.write() = ProgressState::starting();
    }

    /// Record a regular installer output line and bump the progress counter.
    pub fn record_line(&self, status: String) {
        let mut state = self.write();
        if state.complete {
            return;
        }
        state.status = status;
        state.progress = state.progress.saturating_add(1);
    }

    /// Replace the status without touching the counter.
    pub fn set_status(&self, status: String) {
        let mut state = self.write();
        if state.complete {
            return;
        }
        state.status = status;
    }

    /// Final transition of a run: set the last status (and optionally the
    /// progress value) together with `complete = true`.
    ///
    /// Ignored if the current run has already completed.
    pub fn finish(&self, status: String, progress: Option<u32>) {
        let mut state = self.write();
        if state.complete {
            return;
        }
        state.status = status;
        if let Some(progress) = progress {
            state.progress = progress;
        }
        state.complete = true;
    }

    // A panicking writer leaves whole-field values behind, so the data is
    // still a valid snapshot after poisoning.
    fn read(&self) -> RwLockReadGuard<'_, ProgressState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProgressState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
