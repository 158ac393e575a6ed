use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AVATAR, DISPLAY_XP_PER_COMPLETED, DISPLAY_XP_PER_LEVEL};
use crate::gamification::achievements::{milestone, Milestone};
use crate::store::{Store, StoreError};

const INLINE_IMAGE_PREFIX: &str = "data:";
const PRESET_PREFIX: &str = "avatar_";

/// Stored as a single string; the variant is recovered from its shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Avatar {
    /// One of the bundled pictures, e.g. `avatar_3`.
    Preset(String),
    /// A `data:` URL uploaded by the learner.
    Inline(String),
    /// Seed for a generated picture, written by older versions.
    Seed(String),
}

impl From<String> for Avatar {
    fn from(raw: String) -> Self {
        if raw.starts_with(INLINE_IMAGE_PREFIX) {
            Self::Inline(raw)
        } else if raw.starts_with(PRESET_PREFIX) {
            Self::Preset(raw)
        } else {
            Self::Seed(raw)
        }
    }
}

impl From<Avatar> for String {
    fn from(avatar: Avatar) -> Self {
        match avatar {
            Avatar::Preset(raw) | Avatar::Inline(raw) | Avatar::Seed(raw) => raw,
        }
    }
}

impl Default for Avatar {
    fn default() -> Self {
        Self::Preset(DEFAULT_AVATAR.to_string())
    }
}

impl Avatar {
    /// Where the picture comes from. Seeds are returned untouched for the
    /// caller's generator.
    pub fn source(&self) -> String {
        match self {
            Self::Preset(id) => format!("/avatars/{}.jpg", id),
            Self::Inline(data) => data.clone(),
            Self::Seed(seed) => seed.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProfile {
    pub name: String,
    pub avatar: Avatar,
}

impl DisplayProfile {
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: Avatar::default(),
        }
    }
}

pub fn load_display_profile(store: &Store, default_name: &str) -> DisplayProfile {
    match store.get_display_profile() {
        Ok(Some(profile)) => profile,
        Ok(None) => DisplayProfile::with_name(default_name),
        Err(error) => {
            tracing::warn!(error = %error, "Failed to load display profile, using default");
            DisplayProfile::with_name(default_name)
        }
    }
}

pub fn load_unlocked_milestones(store: &Store) -> Vec<String> {
    match store.get_unlocked_achievements() {
        Ok(Some(ids)) => ids,
        Ok(None) => Vec::new(),
        Err(error) => {
            tracing::warn!(error = %error, "Failed to load unlocked milestones, using empty list");
            Vec::new()
        }
    }
}

/// Totals shown on the profile page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOverview {
    pub profile: DisplayProfile,
    pub avatar_source: String,
    pub total_time_ms: u64,
    pub completed: u64,
    pub xp: u64,
    pub level: u64,
    /// Progress into the current display level, 0..100.
    pub level_percent: f64,
    #[serde(skip)]
    pub milestones: Vec<&'static Milestone>,
}

/// Display xp counts finished steps plus milestone rewards; it is unrelated
/// to the gamification profile's xp.
pub fn display_xp(completed: u64, milestones: &[&Milestone]) -> u64 {
    let rewards: u64 = milestones.iter().filter_map(|m| m.xp_reward).sum();
    completed * DISPLAY_XP_PER_COMPLETED + rewards
}

pub fn overview(store: &Store, default_name: &str) -> Result<ProfileOverview, StoreError> {
    let ledgers = store.list_attempt_stats()?;
    let total_time_ms = ledgers.iter().map(|(_, s)| s.total_time).sum();
    let completed = ledgers.iter().map(|(_, s)| u64::from(s.completed)).sum();

    let milestones: Vec<&'static Milestone> = load_unlocked_milestones(store)
        .iter()
        .filter_map(|id| milestone(id))
        .collect();

    let xp = display_xp(completed, &milestones);
    let into_level = xp % DISPLAY_XP_PER_LEVEL;
    let profile = load_display_profile(store, default_name);

    Ok(ProfileOverview {
        avatar_source: profile.avatar.source(),
        profile,
        total_time_ms,
        completed,
        xp,
        level: 1 + xp / DISPLAY_XP_PER_LEVEL,
        level_percent: into_level as f64 * 100.0 / DISPLAY_XP_PER_LEVEL as f64,
        milestones,
    })
}
