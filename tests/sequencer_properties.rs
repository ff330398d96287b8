// tests/sequencer_properties.rs

use proptest::prelude::*;

use installer_shim::engine::{PromptSequencer, RejectReason, RunPhase, SequencerStep};
use installer_shim::exec::answers_payload;

proptest! {
    #[test]
    fn n_prompts_yield_n_minus_one_next_prompts_then_one_start(
        answers in proptest::collection::vec(".*", 1..10)
    ) {
        let prompts: Vec<String> = (0..answers.len()).map(|i| format!("Q{i}")).collect();
        let mut seq = PromptSequencer::new(prompts.clone());
        let last = answers.len() - 1;

        for (i, answer) in answers.iter().enumerate() {
            let step = seq.submit(answer.clone());
            if i < last {
                prop_assert_eq!(step, SequencerStep::NextPrompt(prompts[i + 1].clone()));
                prop_assert_eq!(seq.phase(), RunPhase::Collecting);
            } else {
                prop_assert_eq!(step, SequencerStep::Complete(answers.clone()));
                prop_assert_eq!(seq.phase(), RunPhase::Running);
            }
        }

        prop_assert_eq!(
            seq.submit("extra".to_string()),
            SequencerStep::Rejected(RejectReason::AlreadyRunning)
        );
    }

    #[test]
    fn payload_lines_are_the_answers_in_order(
        answers in proptest::collection::vec("[^\n\r]*", 0..10)
    ) {
        let payload = answers_payload(&answers);
        prop_assert!(payload.ends_with('\n'));

        let mut lines: Vec<&str> = payload.split('\n').collect();
        prop_assert_eq!(lines.pop(), Some(""));
        if answers.is_empty() {
            prop_assert_eq!(lines, vec![""]);
        } else {
            prop_assert_eq!(lines, answers);
        }
    }
}
