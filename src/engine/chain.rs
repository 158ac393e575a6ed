use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::content::{group_prefix, ContentStore, LessonDefinition};

/// Ordered lesson keys of one learning path and where a lesson sits in it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainPosition {
    pub chain: Vec<String>,
    pub current_index: usize,
}

impl ChainPosition {
    fn single(key: &str) -> Self {
        Self {
            chain: vec![key.to_string()],
            current_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 >= self.chain.len()
    }
}

/// Resolves the chain containing `key`.
///
/// Lessons with an explicit `groupId` are ordered by `order`. Everything else
/// is grouped by key prefix and ordered by walking `nextLessonId` from the one
/// lesson nobody points at. Never fails: an unknown key yields an empty chain
/// and a group without a unique head yields a single-element chain.
pub fn resolve(content: &ContentStore, key: &str) -> ChainPosition {
    let Some(lesson) = content.get(key) else {
        tracing::debug!(key, "Chain requested for unknown lesson");
        return ChainPosition::default();
    };

    let chain = match &lesson.group_id {
        Some(group) => explicit_chain(content, group),
        None => walk_prefix_chain(content, key),
    };

    match chain {
        Some(chain) => {
            let current_index = chain.iter().position(|k| k == key).unwrap_or(0);
            ChainPosition {
                chain,
                current_index,
            }
        }
        None => ChainPosition::single(key),
    }
}

fn explicit_chain(content: &ContentStore, group: &str) -> Option<Vec<String>> {
    let mut members: Vec<&LessonDefinition> = content
        .iter()
        .filter(|lesson| lesson.group_id.as_deref() == Some(group))
        .collect();
    members.sort_by(|a, b| {
        a.order
            .unwrap_or(u32::MAX)
            .cmp(&b.order.unwrap_or(u32::MAX))
            .then_with(|| a.id.cmp(&b.id))
    });
    Some(members.into_iter().map(|lesson| lesson.id.clone()).collect())
}

fn walk_prefix_chain(content: &ContentStore, key: &str) -> Option<Vec<String>> {
    let prefix = group_prefix(key);
    let candidates: BTreeMap<&str, &LessonDefinition> = content
        .iter()
        .filter(|lesson| lesson.group_id.is_none() && group_prefix(&lesson.id) == prefix)
        .map(|lesson| (lesson.id.as_str(), lesson))
        .collect();

    let referenced: HashSet<&str> = candidates
        .values()
        .filter_map(|lesson| lesson.next_lesson_id.as_deref())
        .collect();
    let mut heads = candidates
        .keys()
        .copied()
        .filter(|id| !referenced.contains(id));

    let head = match (heads.next(), heads.next()) {
        (Some(head), None) => head,
        (first, _) => {
            tracing::debug!(
                prefix,
                candidates = candidates.len(),
                has_head = first.is_some(),
                "No unique chain head, using degenerate chain"
            );
            return None;
        }
    };

    // Bounded by the group size so a same-group cycle cannot spin forever.
    let mut chain = Vec::with_capacity(candidates.len());
    let mut visited: HashSet<&str> = HashSet::new();
    let mut cursor = candidates.get(head).copied();
    while let Some(lesson) = cursor {
        if chain.len() >= candidates.len() || !visited.insert(lesson.id.as_str()) {
            tracing::debug!(prefix, at = %lesson.id, "Chain walk stopped on a revisited lesson");
            break;
        }
        chain.push(lesson.id.clone());
        cursor = lesson
            .next_lesson_id
            .as_deref()
            .and_then(|next| candidates.get(next).copied());
    }

    Some(chain)
}
