use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{DragDropConfig, LessonBody, LessonDefinition, TheoryBlock, VerifyRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Error,
    /// The trap card was placed first in a sequence exercise.
    Trap,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_mistake(self) -> bool {
        !self.is_success()
    }
}

/// What the learner picked: a quiz option id or a raw simulation value.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Choice(String),
    Value(Value),
}

/// Transient answer state of one lesson view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerState {
    pub selection: Option<Selection>,
    pub sequence: Vec<String>,
    /// Block index → the learner's true/false answer.
    pub block_answers: BTreeMap<usize, bool>,
}

impl AnswerState {
    pub fn clear(&mut self) {
        self.selection = None;
        self.sequence.clear();
        self.block_answers.clear();
    }
}

/// Acceptance test for a simulation value. Rules are opaque to the validator.
pub trait AnswerPredicate {
    fn accepts(&self, value: &Value) -> bool;
}

impl AnswerPredicate for VerifyRule {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Equals { value: expected } => values_match(expected, value),
            Self::OneOf { values } => values.iter().any(|expected| values_match(expected, value)),
            Self::Between { min, max } => value
                .as_f64()
                .map(|v| (*min..=*max).contains(&v))
                .unwrap_or(false),
            Self::Any => true,
        }
    }
}

/// Numbers compare by value so `50` and `50.0` are the same answer.
fn values_match(expected: &Value, actual: &Value) -> bool {
    match (expected.as_f64(), actual.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => expected == actual,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockVerdict {
    Correct,
    Incorrect,
    Unanswered,
}

/// Judges every true/false block; other blocks are skipped.
pub fn evaluate_blocks(
    blocks: &[TheoryBlock],
    answers: &BTreeMap<usize, bool>,
) -> Vec<(usize, BlockVerdict)> {
    blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| {
            let expected = block.expected_answer()?;
            let verdict = match answers.get(&index) {
                None => BlockVerdict::Unanswered,
                Some(given) if *given == expected => BlockVerdict::Correct,
                Some(_) => BlockVerdict::Incorrect,
            };
            Some((index, verdict))
        })
        .collect()
}

pub fn validate(lesson: &LessonDefinition, answer: &AnswerState) -> Outcome {
    let outcome = match &lesson.body {
        LessonBody::Theory { blocks, .. } => {
            let verdicts = evaluate_blocks(blocks, &answer.block_answers);
            if verdicts
                .iter()
                .all(|(_, verdict)| *verdict == BlockVerdict::Correct)
            {
                Outcome::Success
            } else {
                Outcome::Error
            }
        }
        LessonBody::Quiz { config } => match &answer.selection {
            Some(Selection::Choice(id)) => {
                if config
                    .options
                    .iter()
                    .any(|option| &option.id == id && option.correct)
                {
                    Outcome::Success
                } else {
                    Outcome::Error
                }
            }
            _ => Outcome::Error,
        },
        LessonBody::Simulation { config } => {
            let accepted = match &answer.selection {
                Some(Selection::Value(value)) => config.verify.accepts(value),
                Some(Selection::Choice(raw)) => config.verify.accepts(&Value::String(raw.clone())),
                None => false,
            };
            if accepted {
                Outcome::Success
            } else {
                Outcome::Error
            }
        }
        LessonBody::DragDrop { config } => validate_sequence(config, &answer.sequence),
    };

    tracing::debug!(lesson = %lesson.id, ?outcome, "Answer validated");
    outcome
}

pub fn validate_sequence(config: &DragDropConfig, sequence: &[String]) -> Outcome {
    if let (Some(trap), Some(first)) = (&config.trap_id, sequence.first()) {
        if first == trap {
            return Outcome::Trap;
        }
    }
    if sequence == config.correct_sequence.as_slice() {
        Outcome::Success
    } else {
        Outcome::Error
    }
}
