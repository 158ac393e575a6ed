use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::LESSON_KEY_DELIMITER;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDefinition {
    pub id: String,
    pub title: String,
    pub instructions: String,
    #[serde(flatten)]
    pub body: LessonBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_lesson_id: Option<String>,
    /// Explicit chain membership. When set, `order` positions the lesson in
    /// its chain and the key prefix is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LessonBody {
    Theory {
        #[serde(default, rename = "theoryBlocks")]
        blocks: Vec<TheoryBlock>,
        /// Older lessons carry a single paragraph instead of blocks.
        #[serde(default, rename = "theoryContent", skip_serializing_if = "Option::is_none")]
        legacy_text: Option<String>,
    },
    Quiz {
        #[serde(rename = "quizConfig")]
        config: QuizConfig,
    },
    DragDrop {
        #[serde(rename = "dragDropConfig")]
        config: DragDropConfig,
    },
    Simulation {
        #[serde(rename = "simulationConfig")]
        config: SimulationConfig,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonKind {
    Theory,
    Quiz,
    DragDrop,
    Simulation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TheoryBlock {
    Text {
        content: String,
    },
    Header {
        content: String,
    },
    List {
        content: Vec<String>,
    },
    Checklist {
        content: Vec<String>,
    },
    Alert {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style: Option<AlertStyle>,
    },
    /// Inline statement the learner marks as true or false.
    TrueFalse {
        content: String,
        answer: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStyle {
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizConfig {
    pub question: String,
    pub options: Vec<QuizOption>,
    pub success_message: String,
    pub error_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragDropConfig {
    /// Pool of cards offered to the learner, trap included.
    pub items: Vec<SequenceItem>,
    pub correct_sequence: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trap_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trap_message: Option<String>,
    pub success_message: String,
    pub error_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceItem {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    #[serde(rename = "type")]
    pub kind: SimulationKind,
    pub initial_code: String,
    pub verify: VerifyRule,
    pub success_message: String,
    pub error_message: String,
    pub options: Vec<SimulationOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationKind {
    RocketLaunch,
    ProjectileMotion,
    FreeFall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationOption {
    pub label: String,
    pub value: Value,
    pub code: String,
}

/// Per-lesson acceptance rule for a simulation value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum VerifyRule {
    Equals { value: Value },
    OneOf { values: Vec<Value> },
    Between { min: f64, max: f64 },
    /// The simulation judges the value itself; any submitted value passes.
    Any,
}

impl LessonBody {
    pub fn kind(&self) -> LessonKind {
        match self {
            Self::Theory { .. } => LessonKind::Theory,
            Self::Quiz { .. } => LessonKind::Quiz,
            Self::DragDrop { .. } => LessonKind::DragDrop,
            Self::Simulation { .. } => LessonKind::Simulation,
        }
    }
}

impl TheoryBlock {
    pub fn expected_answer(&self) -> Option<bool> {
        match self {
            Self::TrueFalse { answer, .. } => Some(*answer),
            _ => None,
        }
    }
}

impl LessonDefinition {
    pub fn kind(&self) -> LessonKind {
        self.body.kind()
    }

    /// Key of the chain this lesson belongs to: the explicit group when
    /// present, otherwise the key minus its last segment.
    pub fn group_key(&self) -> String {
        match &self.group_id {
            Some(group) => group.clone(),
            None => group_prefix(&self.id).to_string(),
        }
    }

    /// Indices of the true/false blocks, in block order.
    pub fn interactive_blocks(&self) -> Vec<usize> {
        match &self.body {
            LessonBody::Theory { blocks, .. } => blocks
                .iter()
                .enumerate()
                .filter(|(_, block)| block.expected_answer().is_some())
                .map(|(index, _)| index)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether checking this lesson counts as answering a question.
    pub fn is_question(&self) -> bool {
        match &self.body {
            LessonBody::Theory { .. } => !self.interactive_blocks().is_empty(),
            _ => true,
        }
    }
}

/// `"Python-Fundamentos-Algoritmos-tea"` → `"Python-Fundamentos-Algoritmos"`.
/// A key without a delimiter is its own group.
pub fn group_prefix(key: &str) -> &str {
    match key.rfind(LESSON_KEY_DELIMITER) {
        Some(idx) => &key[..idx],
        None => key,
    }
}
