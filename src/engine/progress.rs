use crate::content::{LessonBody, LessonDefinition};
use crate::engine::validator::{AnswerState, Outcome};

/// Completion of the current lesson alone, in `[0, 1]`.
pub fn intra_progress(
    lesson: &LessonDefinition,
    answer: &AnswerState,
    outcome: Option<Outcome>,
) -> f64 {
    let succeeded = outcome.is_some_and(Outcome::is_success);

    match &lesson.body {
        LessonBody::Theory { .. } => {
            let interactive = lesson.interactive_blocks();
            if interactive.is_empty() {
                return if succeeded { 1.0 } else { 0.0 };
            }
            let answered = interactive
                .iter()
                .filter(|index| answer.block_answers.contains_key(index))
                .count();
            answered as f64 / interactive.len() as f64
        }
        LessonBody::DragDrop { config } => {
            if succeeded {
                return 1.0;
            }
            let target = config.correct_sequence.len();
            if target == 0 {
                return 0.0;
            }
            (answer.sequence.len() as f64 / target as f64).min(1.0)
        }
        LessonBody::Quiz { .. } | LessonBody::Simulation { .. } => {
            if succeeded {
                1.0
            } else if answer.selection.is_some() {
                0.5
            } else {
                0.0
            }
        }
    }
}

/// Position in the chain plus progress inside the current lesson, as a
/// percentage capped at 100. An empty chain counts as a one-lesson chain.
pub fn overall_percent(chain_index: usize, chain_len: usize, intra: f64) -> f64 {
    let len = chain_len.max(1) as f64;
    let intra = intra.clamp(0.0, 1.0);
    ((chain_index as f64 + intra) / len * 100.0).min(100.0)
}
