use serde_json::json;

use physicode::content::{
    DragDropConfig, LessonBody, LessonDefinition, QuizConfig, QuizOption, SequenceItem,
    SimulationConfig, SimulationKind, TheoryBlock, VerifyRule,
};

pub fn lesson(id: &str, body: LessonBody, next: Option<&str>) -> LessonDefinition {
    LessonDefinition {
        id: id.to_string(),
        title: format!("title-{id}"),
        instructions: String::new(),
        body,
        next_lesson_id: next.map(str::to_string),
        group_id: None,
        order: None,
    }
}

pub fn theory(id: &str, next: Option<&str>) -> LessonDefinition {
    let body = LessonBody::Theory {
        blocks: vec![TheoryBlock::Text {
            content: "lectura".to_string(),
        }],
        legacy_text: None,
    };
    lesson(id, body, next)
}

pub fn true_false(id: &str, answers: &[bool], next: Option<&str>) -> LessonDefinition {
    let blocks = answers
        .iter()
        .enumerate()
        .map(|(idx, answer)| TheoryBlock::TrueFalse {
            content: format!("afirmación {idx}"),
            answer: *answer,
        })
        .collect();
    lesson(
        id,
        LessonBody::Theory {
            blocks,
            legacy_text: None,
        },
        next,
    )
}

/// Option `B` is the correct one.
pub fn quiz(id: &str, next: Option<&str>) -> LessonDefinition {
    let options = ["A", "B", "C"]
        .iter()
        .map(|opt| QuizOption {
            id: opt.to_string(),
            text: format!("opción {opt}"),
            correct: *opt == "B",
        })
        .collect();
    let body = LessonBody::Quiz {
        config: QuizConfig {
            question: "¿Cuál?".to_string(),
            options,
            success_message: "bien".to_string(),
            error_message: "mal".to_string(),
        },
    };
    lesson(id, body, next)
}

/// Cards `1..=len` plus a `trap` card.
pub fn drag_drop(id: &str, len: usize, next: Option<&str>) -> LessonDefinition {
    let correct: Vec<String> = (1..=len).map(|n| n.to_string()).collect();
    let mut items: Vec<SequenceItem> = correct
        .iter()
        .map(|n| SequenceItem {
            id: n.clone(),
            text: format!("paso {n}"),
        })
        .collect();
    items.push(SequenceItem {
        id: "trap".to_string(),
        text: "trampa".to_string(),
    });
    let body = LessonBody::DragDrop {
        config: DragDropConfig {
            items,
            correct_sequence: correct,
            trap_id: Some("trap".to_string()),
            trap_message: Some("¡trampa!".to_string()),
            success_message: "bien".to_string(),
            error_message: "mal".to_string(),
        },
    };
    lesson(id, body, next)
}

/// Accepts exactly `50`.
pub fn rocket(id: &str, next: Option<&str>) -> LessonDefinition {
    let body = LessonBody::Simulation {
        config: SimulationConfig {
            kind: SimulationKind::RocketLaunch,
            initial_code: "fuel = ?".to_string(),
            verify: VerifyRule::Equals { value: json!(50) },
            success_message: "despegue".to_string(),
            error_message: "no despega".to_string(),
            options: Vec::new(),
        },
    };
    lesson(id, body, next)
}

/// `prefix-s0 -> prefix-s1 -> ...`, all plain theory lessons.
pub fn linear_chain(prefix: &str, len: usize) -> Vec<LessonDefinition> {
    let keys: Vec<String> = (0..len).map(|n| format!("{prefix}-s{n}")).collect();
    keys.iter()
        .enumerate()
        .map(|(idx, key)| theory(key, keys.get(idx + 1).map(String::as_str)))
        .collect()
}

pub fn grouped(mut lesson: LessonDefinition, group: &str, order: u32) -> LessonDefinition {
    lesson.group_id = Some(group.to_string());
    lesson.order = Some(order);
    lesson.next_lesson_id = None;
    lesson
}
