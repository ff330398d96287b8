// src/engine/sequencer.rs

//! Pure prompt sequencing state machine.
//!
//! Collects answers in order and decides, after every submission, whether
//! the caller gets the next prompt or the installation should start. It has
//! no channels, no Tokio types, and does not perform any IO; the
//! [`Orchestrator`](super::Orchestrator) keeps it behind a mutex, which makes
//! the check-and-transition to `Running` a single atomic step.

use tracing::debug;

use super::{RejectReason, RunPhase};

/// Result of feeding one answer into the sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerStep {
    /// More answers are needed; this is the next question.
    NextPrompt(String),
    /// All answers are in. Returned exactly once per cycle.
    Complete(Vec<String>),
    /// The answer was not accepted; nothing changed.
    Rejected(RejectReason),
}

#[derive(Debug)]
pub struct PromptSequencer {
    prompts: Vec<String>,
    answers: Vec<String>,
    phase: RunPhase,
}

impl PromptSequencer {
    pub fn new(prompts: Vec<String>) -> Self {
        Self {
            prompts,
            answers: Vec::new(),
            phase: RunPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers collected so far in the current cycle.
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// The prompt waiting for an answer, if any.
    pub fn current_prompt(&self) -> Option<&str> {
        match self.phase {
            RunPhase::NotStarted | RunPhase::Collecting => {
                self.prompts.get(self.answers.len()).map(String::as_str)
            }
            RunPhase::Running | RunPhase::Done => None,
        }
    }

    /// Accept one answer. Content is never inspected; an empty string is a
    /// valid "skip".
    pub fn submit(&mut self, answer: String) -> SequencerStep {
        match self.phase {
            RunPhase::Running => {
                return SequencerStep::Rejected(RejectReason::AlreadyRunning);
            }
            RunPhase::Done => {
                debug!("previous run finished; starting a fresh answer cycle");
                self.answers.clear();
            }
            RunPhase::NotStarted | RunPhase::Collecting => {}
        }

        if self.prompts.is_empty() {
            debug!("no prompts configured; starting installation without answers");
            self.phase = RunPhase::Running;
            return SequencerStep::Complete(Vec::new());
        }

        self.answers.push(answer);
        let collected = self.answers.len();

        if collected < self.prompts.len() {
            self.phase = RunPhase::Collecting;
            SequencerStep::NextPrompt(self.prompts[collected].clone())
        } else {
            self.phase = RunPhase::Running;
            SequencerStep::Complete(self.answers.clone())
        }
    }

    /// Mark the running installation as finished. No-op in any other phase.
    pub fn finish(&mut self) {
        if self.phase == RunPhase::Running {
            self.phase = RunPhase::Done;
        }
    }
}
