// src/engine/orchestrator.rs

//! Async shell around the prompt sequencer and the installation runner.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::exec::InstallerBackend;
use crate::state::{ProgressState, ProgressStore};

use super::runner::{InstallationRunner, RunnerOptions};
use super::sequencer::{PromptSequencer, SequencerStep};
use super::{RunPhase, SubmitOutcome};

/// Entry point for the HTTP layer.
///
/// Owns the one sequencer and the one runner of the process. Cloned into
/// handlers behind an `Arc`.
pub struct Orchestrator {
    sequencer: Arc<Mutex<PromptSequencer>>,
    runner: Arc<InstallationRunner>,
}

impl Orchestrator {
    pub fn new(
        prompts: Vec<String>,
        backend: Arc<dyn InstallerBackend>,
        options: RunnerOptions,
    ) -> Self {
        let store = ProgressStore::new(prompts.first().cloned());
        let runner = InstallationRunner::new(backend, store, options);
        Self {
            sequencer: Arc::new(Mutex::new(PromptSequencer::new(prompts))),
            runner: Arc::new(runner),
        }
    }

    pub fn store(&self) -> &ProgressStore {
        self.runner.store()
    }

    /// Current progress snapshot.
    pub fn progress(&self) -> ProgressState {
        self.store().snapshot()
    }

    pub fn phase(&self) -> RunPhase {
        lock(&self.sequencer).phase()
    }

    /// Submit the next answer.
    ///
    /// Must be called from within a Tokio runtime: the final answer launches
    /// the installation on a background task.
    pub fn submit(&self, answer: String) -> SubmitOutcome {
        let mut sequencer = lock(&self.sequencer);
        let new_cycle = sequencer.phase() == RunPhase::Done;

        match sequencer.submit(answer) {
            SequencerStep::NextPrompt(prompt) => {
                debug!(
                    collected = sequencer.answers().len(),
                    total = sequencer.prompts().len(),
                    prompt = %prompt,
                    "answer accepted; asking next prompt"
                );
                let current = sequencer.current_prompt().map(str::to_string);
                if new_cycle {
                    // The finished run's result gives way to the new cycle as
                    // a whole, never field by field.
                    self.store().reset_for_cycle(current);
                } else {
                    self.store().set_current_prompt(current);
                }
                SubmitOutcome::NextPrompt(prompt)
            }
            SequencerStep::Complete(answers) => {
                info!(answers = answers.len(), "all answers collected; launching installer");
                // Still under the sequencer lock: no second trigger can slip in
                // between the phase change and the store reset.
                let handle = self.runner.start(answers);

                let sequencer = Arc::clone(&self.sequencer);
                let store = self.store().clone();
                tokio::spawn(async move {
                    match handle.await {
                        Ok(outcome) => {
                            debug!(?outcome, "installation task ended");
                        }
                        Err(err) => {
                            error!(error = %err, "installation task aborted");
                            store.finish(format!("Installation failed: {err}"), None);
                        }
                    }
                    lock(&sequencer).finish();
                });

                SubmitOutcome::Started
            }
            SequencerStep::Rejected(reason) => {
                warn!(%reason, "answer rejected");
                SubmitOutcome::Rejected(reason)
            }
        }
    }
}

// Sequencer transitions are single assignments; the state stays coherent
// even if a holder panicked.
fn lock(sequencer: &Mutex<PromptSequencer>) -> MutexGuard<'_, PromptSequencer> {
    sequencer.lock().unwrap_or_else(PoisonError::into_inner)
}
