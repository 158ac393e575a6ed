use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::content::{LessonBody, LessonDefinition, TheoryBlock};
use crate::engine::chain::ChainPosition;
use crate::engine::progress::{intra_progress, overall_percent};
use crate::engine::validator::{self, AnswerState, Outcome, Selection};

/// Why an answer edit was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("lesson already solved")]
    Frozen,
    #[error("lesson does not take this kind of answer")]
    WrongKind,
    #[error("unknown item {0}")]
    UnknownItem(String),
    #[error("item {0} already placed")]
    AlreadyPlaced(String),
    #[error("block {0} is not a true/false statement")]
    NotABlockQuestion(usize),
}

/// State of one lesson view, from entering a lesson until leaving it.
#[derive(Debug, Clone)]
pub struct LessonSession {
    lesson_key: String,
    group: String,
    position: ChainPosition,
    answer: AnswerState,
    mistakes: u32,
    entered_at: DateTime<Utc>,
    outcome: Option<Outcome>,
    /// Set once the solved lesson was booked into the group ledger.
    advanced: bool,
}

impl LessonSession {
    pub fn new(lesson: &LessonDefinition, position: ChainPosition, entered_at: DateTime<Utc>) -> Self {
        Self {
            lesson_key: lesson.id.clone(),
            group: lesson.group_key(),
            position,
            answer: AnswerState::default(),
            mistakes: 0,
            entered_at,
            outcome: None,
            advanced: false,
        }
    }

    pub fn lesson_key(&self) -> &str {
        &self.lesson_key
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn position(&self) -> &ChainPosition {
        &self.position
    }

    pub fn answer(&self) -> &AnswerState {
        &self.answer
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn entered_at(&self) -> DateTime<Utc> {
        self.entered_at
    }

    pub fn is_solved(&self) -> bool {
        self.outcome.is_some_and(Outcome::is_success)
    }

    pub fn is_advanced(&self) -> bool {
        self.advanced
    }

    pub(crate) fn mark_advanced(&mut self) {
        self.advanced = true;
    }

    /// Time spent in this view. A clock that went backwards counts as zero.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.entered_at).num_milliseconds()).unwrap_or(0)
    }

    // Editing after a failed check clears the feedback.
    fn begin_edit(&mut self) -> Result<(), EditError> {
        if self.is_solved() {
            return Err(EditError::Frozen);
        }
        self.outcome = None;
        Ok(())
    }

    pub fn select_option(&mut self, lesson: &LessonDefinition, id: &str) -> Result<(), EditError> {
        match &lesson.body {
            LessonBody::Quiz { config } => {
                if !config.options.iter().any(|option| option.id == id) {
                    return Err(EditError::UnknownItem(id.to_string()));
                }
            }
            LessonBody::Simulation { .. } => {}
            _ => return Err(EditError::WrongKind),
        }
        self.begin_edit()?;
        self.answer.selection = Some(Selection::Choice(id.to_string()));
        Ok(())
    }

    pub fn select_value(&mut self, lesson: &LessonDefinition, value: Value) -> Result<(), EditError> {
        if !matches!(lesson.body, LessonBody::Simulation { .. }) {
            return Err(EditError::WrongKind);
        }
        self.begin_edit()?;
        self.answer.selection = Some(Selection::Value(value));
        Ok(())
    }

    pub fn place_item(&mut self, lesson: &LessonDefinition, id: &str) -> Result<(), EditError> {
        let LessonBody::DragDrop { config } = &lesson.body else {
            return Err(EditError::WrongKind);
        };
        if !config.items.iter().any(|item| item.id == id) {
            return Err(EditError::UnknownItem(id.to_string()));
        }
        if self.answer.sequence.iter().any(|placed| placed == id) {
            return Err(EditError::AlreadyPlaced(id.to_string()));
        }
        self.begin_edit()?;
        self.answer.sequence.push(id.to_string());
        Ok(())
    }

    pub fn remove_last_item(&mut self) -> Result<Option<String>, EditError> {
        self.begin_edit()?;
        Ok(self.answer.sequence.pop())
    }

    pub fn clear_sequence(&mut self) -> Result<(), EditError> {
        self.begin_edit()?;
        self.answer.sequence.clear();
        Ok(())
    }

    pub fn answer_block(
        &mut self,
        lesson: &LessonDefinition,
        index: usize,
        value: bool,
    ) -> Result<(), EditError> {
        let LessonBody::Theory { blocks, .. } = &lesson.body else {
            return Err(EditError::WrongKind);
        };
        if !matches!(blocks.get(index), Some(TheoryBlock::TrueFalse { .. })) {
            return Err(EditError::NotABlockQuestion(index));
        }
        self.begin_edit()?;
        self.answer.block_answers.insert(index, value);
        Ok(())
    }

    /// Validates the current answer. Returns `None` when there is nothing to
    /// judge yet or the lesson is already solved.
    pub fn check(&mut self, lesson: &LessonDefinition) -> Option<Outcome> {
        if self.is_solved() {
            return None;
        }
        let nothing_to_check = match &lesson.body {
            LessonBody::Quiz { .. } | LessonBody::Simulation { .. } => self.answer.selection.is_none(),
            LessonBody::DragDrop { .. } => self.answer.sequence.is_empty(),
            LessonBody::Theory { .. } => false,
        };
        if nothing_to_check {
            return None;
        }

        let outcome = validator::validate(lesson, &self.answer);
        if outcome.is_mistake() {
            self.mistakes += 1;
        }
        self.outcome = Some(outcome);
        Some(outcome)
    }

    pub fn progress_percent(&self, lesson: &LessonDefinition) -> f64 {
        let intra = intra_progress(lesson, &self.answer, self.outcome);
        overall_percent(self.position.current_index, self.position.len(), intra)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::content::ContentStore;
    use crate::engine::chain;

    fn open(content: &ContentStore, key: &str) -> LessonSession {
        let lesson = content.get(key).unwrap();
        LessonSession::new(lesson, chain::resolve(content, key), Utc::now())
    }

    #[test]
    fn trap_and_error_each_count_a_mistake() {
        let content = ContentStore::bundled().unwrap();
        let tea = content.get("Python-Fundamentos-Algoritmos-tea").unwrap();
        let mut session = open(&content, &tea.id);

        session.place_item(tea, "trap").unwrap();
        assert_eq!(session.check(tea), Some(Outcome::Trap));
        session.clear_sequence().unwrap();
        assert_eq!(session.outcome(), None);

        for id in ["2", "1", "3", "4"] {
            session.place_item(tea, id).unwrap();
        }
        assert_eq!(session.check(tea), Some(Outcome::Error));
        assert_eq!(session.mistakes(), 2);

        session.clear_sequence().unwrap();
        for id in ["1", "2", "3", "4"] {
            session.place_item(tea, id).unwrap();
        }
        assert_eq!(session.check(tea), Some(Outcome::Success));
        assert_eq!(session.mistakes(), 2);
        assert_eq!(session.remove_last_item(), Err(EditError::Frozen));
        assert_eq!(session.check(tea), None);
    }

    #[test]
    fn placing_rejects_unknown_and_duplicate_cards() {
        let content = ContentStore::bundled().unwrap();
        let tea = content.get("Python-Fundamentos-Algoritmos-tea").unwrap();
        let mut session = open(&content, &tea.id);

        session.place_item(tea, "1").unwrap();
        assert_eq!(
            session.place_item(tea, "1"),
            Err(EditError::AlreadyPlaced("1".into()))
        );
        assert_eq!(
            session.place_item(tea, "zzz"),
            Err(EditError::UnknownItem("zzz".into()))
        );
        assert_eq!(session.remove_last_item(), Ok(Some("1".into())));
        assert_eq!(session.remove_last_item(), Ok(None));
    }

    #[test]
    fn empty_answers_are_not_checked() {
        let content = ContentStore::bundled().unwrap();
        let quiz = content.get("Python-Fundamentos-Algoritmos-quiz").unwrap();
        let mut session = open(&content, &quiz.id);
        assert_eq!(session.check(quiz), None);
        assert_eq!(session.mistakes(), 0);
    }

    #[test]
    fn partial_true_false_answers_fail_and_report_half_progress() {
        let content = ContentStore::bundled().unwrap();
        let concepts = content.get("Python-Fundamentos-Algoritmos-concepts").unwrap();
        let blocks = concepts.interactive_blocks();
        assert_eq!(blocks.len(), 2);
        let mut session = open(&content, &concepts.id);

        session.answer_block(concepts, blocks[0], true).unwrap();
        assert_eq!(session.check(concepts), Some(Outcome::Error));
        assert_eq!(
            intra_progress(concepts, session.answer(), session.outcome()),
            0.5
        );

        session.answer_block(concepts, blocks[1], false).unwrap();
        assert_eq!(session.check(concepts), Some(Outcome::Success));
        assert_eq!(
            session.answer_block(concepts, 0, true),
            Err(EditError::NotABlockQuestion(0))
        );
    }

    #[test]
    fn elapsed_time_is_never_negative() {
        let content = ContentStore::bundled().unwrap();
        let session = open(&content, "Python-Fundamentos-Algoritmos-study");
        let entered = session.entered_at();
        assert_eq!(session.elapsed_ms(entered + Duration::milliseconds(1500)), 1500);
        assert_eq!(session.elapsed_ms(entered - Duration::seconds(5)), 0);
    }
}
