// src/engine/mod.rs

//! Installation orchestration engine.
//!
//! This module ties together:
//! - the prompt sequencer (which answers are still missing)
//! - the installation runner (installer output → progress store)
//! - the orchestrator, which owns both and is shared with the HTTP layer
//!
//! The pure sequencing state machine lives in [`sequencer`]; the async/IO
//! shell is implemented in [`orchestrator`] and [`runner`].

use std::fmt;

/// Lifecycle of the answer collection and the installation it triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// No answer submitted yet.
    NotStarted,
    /// Some, but not all, answers collected.
    Collecting,
    /// An installation is in progress; answers are rejected.
    Running,
    /// The last installation finished; the next answer opens a new cycle.
    Done,
}

/// Why a submitted answer was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    AlreadyRunning,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::AlreadyRunning => f.write_str("installation already running"),
        }
    }
}

/// What the caller learns after submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    NextPrompt(String),
    Started,
    Rejected(RejectReason),
}

pub mod orchestrator;
pub mod runner;
pub mod sequencer;

pub use orchestrator::Orchestrator;
pub use runner::{InstallationRunner, RunOutcome, RunnerOptions};
pub use sequencer::{PromptSequencer, SequencerStep};
