pub mod types;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use thiserror::Error;

pub use types::*;

const BUNDLED_LESSONS: &str = include_str!("bundled/lessons.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read lesson pack: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse lesson pack: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid lesson {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Soft problems in a lesson pack. The engine tolerates all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentIssue {
    DanglingNext { key: String, next: String },
    SelfReference { key: String },
    DuplicateOrder { group: String, order: u32 },
}

/// Read-only lesson catalog keyed by lesson identifier.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    lessons: BTreeMap<String, LessonDefinition>,
}

impl ContentStore {
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_json_str(BUNDLED_LESSONS)
    }

    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parses a `{ key: LessonDefinition }` map and checks it structurally.
    pub fn from_json_str(raw: &str) -> Result<Self, ContentError> {
        let lessons: BTreeMap<String, LessonDefinition> = serde_json::from_str(raw)?;
        for (key, lesson) in &lessons {
            check_lesson(key, lesson)?;
        }
        tracing::debug!(lessons = lessons.len(), "Lesson pack loaded");
        Ok(Self { lessons })
    }

    pub fn from_lessons<I>(lessons: I) -> Result<Self, ContentError>
    where
        I: IntoIterator<Item = LessonDefinition>,
    {
        let mut map = BTreeMap::new();
        for lesson in lessons {
            check_lesson(&lesson.id, &lesson)?;
            if map.contains_key(&lesson.id) {
                return Err(ContentError::Invalid {
                    key: lesson.id.clone(),
                    reason: "duplicate lesson id".to_string(),
                });
            }
            map.insert(lesson.id.clone(), lesson);
        }
        Ok(Self { lessons: map })
    }

    pub fn get(&self, key: &str) -> Option<&LessonDefinition> {
        self.lessons.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LessonDefinition> {
        self.lessons.values()
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Lessons no other lesson points at. Each one starts a chain.
    pub fn heads(&self) -> Vec<&LessonDefinition> {
        let referenced: HashSet<&str> = self
            .lessons
            .values()
            .filter_map(|lesson| lesson.next_lesson_id.as_deref())
            .collect();
        self.lessons
            .values()
            .filter(|lesson| !referenced.contains(lesson.id.as_str()))
            .collect()
    }

    pub fn audit(&self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();
        let mut orders: HashSet<(String, u32)> = HashSet::new();

        for lesson in self.lessons.values() {
            if let Some(next) = &lesson.next_lesson_id {
                if next == &lesson.id {
                    issues.push(ContentIssue::SelfReference {
                        key: lesson.id.clone(),
                    });
                } else if !self.lessons.contains_key(next) {
                    issues.push(ContentIssue::DanglingNext {
                        key: lesson.id.clone(),
                        next: next.clone(),
                    });
                }
            }
            if let (Some(group), Some(order)) = (&lesson.group_id, lesson.order) {
                if !orders.insert((group.clone(), order)) {
                    issues.push(ContentIssue::DuplicateOrder {
                        group: group.clone(),
                        order,
                    });
                }
            }
        }

        issues
    }
}

fn check_lesson(key: &str, lesson: &LessonDefinition) -> Result<(), ContentError> {
    let invalid = |reason: String| ContentError::Invalid {
        key: key.to_string(),
        reason,
    };

    if lesson.id != key {
        return Err(invalid(format!("id {:?} does not match its key", lesson.id)));
    }

    match &lesson.body {
        LessonBody::DragDrop { config } => {
            let pool: HashSet<&str> = config.items.iter().map(|item| item.id.as_str()).collect();
            if let Some(missing) = config
                .correct_sequence
                .iter()
                .find(|id| !pool.contains(id.as_str()))
            {
                return Err(invalid(format!("sequence item {missing:?} is not in the pool")));
            }
            if let Some(trap) = &config.trap_id {
                if !pool.contains(trap.as_str()) {
                    return Err(invalid(format!("trap {trap:?} is not in the pool")));
                }
                if config.correct_sequence.contains(trap) {
                    return Err(invalid(format!("trap {trap:?} is part of the correct sequence")));
                }
            }
        }
        LessonBody::Quiz { config } => {
            if !config.options.iter().any(|option| option.correct) {
                return Err(invalid("quiz has no correct option".to_string()));
            }
        }
        LessonBody::Theory { .. } | LessonBody::Simulation { .. } => {}
    }

    Ok(())
}
