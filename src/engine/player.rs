use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::content::{ContentStore, LessonBody, LessonDefinition, SimulationKind};
use crate::engine::chain::{self, ChainPosition};
use crate::engine::recorder::{AttemptRecorder, ChainSummary};
use crate::engine::session::LessonSession;
use crate::engine::validator::Outcome;
use crate::gamification::achievements::{met_milestones, ChainCompletion, Milestone};
use crate::gamification::display::load_unlocked_milestones;
use crate::gamification::profile::{GamificationProfile, ProfileTracker};
use crate::store::{Store, StoreError};

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("lesson not found: {0}")]
    LessonNotFound(String),
    #[error("lesson {0} has not been solved yet")]
    NotCompleted(String),
    #[error("lesson {0} was already continued")]
    AlreadyAdvanced(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of pressing "check".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub outcome: Outcome,
    pub progress_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub leveled_up: bool,
    pub new_achievements: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReport {
    pub group: String,
    pub summary: ChainSummary,
    #[serde(skip)]
    pub new_milestones: Vec<&'static Milestone>,
}

/// Result of pressing "continue" on a solved lesson.
#[derive(Debug, Clone)]
pub enum Advance {
    Next(String),
    Finished(ChainReport),
}

/// Drives lesson views against the content pack and local storage.
pub struct LessonPlayer {
    content: Arc<ContentStore>,
    store: Arc<Store>,
    profile: ProfileTracker,
    recorder: AttemptRecorder,
}

impl LessonPlayer {
    pub fn new(content: Arc<ContentStore>, store: Arc<Store>) -> Self {
        Self {
            profile: ProfileTracker::load(store.clone()),
            recorder: AttemptRecorder::new(store.clone()),
            content,
            store,
        }
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn profile(&self) -> &GamificationProfile {
        self.profile.profile()
    }

    pub fn recorder(&self) -> &AttemptRecorder {
        &self.recorder
    }

    pub fn lesson(&self, key: &str) -> Result<&LessonDefinition, PlayerError> {
        self.content
            .get(key)
            .ok_or_else(|| PlayerError::LessonNotFound(key.to_string()))
    }

    /// Enters a lesson. Answer state always starts empty.
    pub fn open(&self, key: &str, now: DateTime<Utc>) -> Result<LessonSession, PlayerError> {
        let lesson = self.lesson(key)?;
        let position = chain::resolve(&self.content, key);
        tracing::debug!(
            lesson = key,
            index = position.current_index,
            chain_len = position.len(),
            "Lesson opened"
        );
        Ok(LessonSession::new(lesson, position, now))
    }

    /// Judges the session's current answer. `Ok(None)` means there was
    /// nothing to judge.
    pub fn check(&mut self, session: &mut LessonSession) -> Result<Option<CheckReport>, PlayerError> {
        let content = Arc::clone(&self.content);
        let lesson = content
            .get(session.lesson_key())
            .ok_or_else(|| PlayerError::LessonNotFound(session.lesson_key().to_string()))?;

        let Some(outcome) = session.check(lesson) else {
            return Ok(None);
        };

        let (leveled_up, new_achievements): (bool, Vec<&'static str>) = if lesson.is_question() {
            let result = self.profile.record_attempt(outcome.is_success());
            (
                result.leveled_up,
                result.new_achievements.iter().map(|def| def.id).collect(),
            )
        } else {
            (false, Vec::new())
        };

        Ok(Some(CheckReport {
            outcome,
            progress_percent: session.progress_percent(lesson),
            message: feedback_message(lesson, outcome),
            leveled_up,
            new_achievements,
        }))
    }

    /// Books the solved lesson into the group ledger and moves on. At the end
    /// of a chain the ledger is summarised and milestones are evaluated.
    /// A session is booked at most once.
    pub fn advance(
        &self,
        session: &mut LessonSession,
        now: DateTime<Utc>,
    ) -> Result<Advance, PlayerError> {
        if !session.is_solved() {
            return Err(PlayerError::NotCompleted(session.lesson_key().to_string()));
        }
        if session.is_advanced() {
            return Err(PlayerError::AlreadyAdvanced(session.lesson_key().to_string()));
        }
        let lesson = self.lesson(session.lesson_key())?;
        let next = next_key(lesson, session.position());

        self.recorder
            .record(session.group(), session.elapsed_ms(now), session.mistakes())?;
        session.mark_advanced();

        if let Some(next) = next {
            return Ok(Advance::Next(next));
        }

        let summary = self.recorder.summary(session.group())?;
        let simulations = self.simulations_in(session.position());
        let completion = ChainCompletion {
            group: session.group(),
            summary: &summary,
            simulations: &simulations,
        };
        let new_milestones = self.unlock_milestones(&completion)?;

        tracing::info!(
            group = session.group(),
            completed = summary.completed,
            mistakes = summary.mistakes,
            accuracy = summary.accuracy,
            "Chain completed"
        );

        Ok(Advance::Finished(ChainReport {
            group: session.group().to_string(),
            summary,
            new_milestones,
        }))
    }

    /// Forgets the pass through `group` once its summary was shown.
    pub fn dismiss_summary(&self, group: &str) -> Result<(), PlayerError> {
        self.recorder.clear(group)?;
        Ok(())
    }

    fn simulations_in(&self, position: &ChainPosition) -> Vec<SimulationKind> {
        position
            .chain
            .iter()
            .filter_map(|key| match &self.content.get(key)?.body {
                LessonBody::Simulation { config } => Some(config.kind),
                _ => None,
            })
            .collect()
    }

    fn unlock_milestones(
        &self,
        completion: &ChainCompletion<'_>,
    ) -> Result<Vec<&'static Milestone>, PlayerError> {
        let mut unlocked = load_unlocked_milestones(&self.store);
        let fresh: Vec<&'static Milestone> = met_milestones(completion)
            .into_iter()
            .filter(|m| !unlocked.iter().any(|id| id == m.id))
            .collect();
        if fresh.is_empty() {
            return Ok(fresh);
        }

        for m in &fresh {
            tracing::info!(milestone = m.id, "Milestone unlocked");
            unlocked.push(m.id.to_string());
        }
        self.store.set_unlocked_achievements(&unlocked)?;
        Ok(fresh)
    }
}

/// Explicitly grouped lessons follow their chain order; the rest follow
/// `nextLessonId`, which may lead into another group.
fn next_key(lesson: &LessonDefinition, position: &ChainPosition) -> Option<String> {
    if lesson.group_id.is_some() {
        return position.chain.get(position.current_index + 1).cloned();
    }
    lesson.next_lesson_id.clone()
}

fn feedback_message(lesson: &LessonDefinition, outcome: Outcome) -> Option<String> {
    let (success, error, trap) = match &lesson.body {
        LessonBody::Theory { .. } => return None,
        LessonBody::Quiz { config } => (&config.success_message, &config.error_message, None),
        LessonBody::Simulation { config } => (&config.success_message, &config.error_message, None),
        LessonBody::DragDrop { config } => (
            &config.success_message,
            &config.error_message,
            config.trap_message.as_ref(),
        ),
    };
    let message = match outcome {
        Outcome::Success => success,
        Outcome::Error => error,
        Outcome::Trap => trap.unwrap_or(error),
    };
    Some(message.clone())
}
