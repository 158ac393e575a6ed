use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{XP_PER_CORRECT, XP_PER_LEVEL};
use crate::gamification::achievements::{AchievementDef, STAT_ACHIEVEMENTS};
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub total_correct: u64,
    pub total_attempts: u64,
    pub current_streak: u32,
    pub best_streak: u32,
}

/// Experience, currency, streaks and unlocked achievement ids.
///
/// `level` is always `1 + xp / 100`; it is serialized for readers of the
/// stored JSON but recomputed whenever a profile is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredProfile")]
pub struct GamificationProfile {
    xp: u64,
    gems: u64,
    level: u64,
    stats: UserStats,
    achievements: Vec<String>,
}

#[derive(Deserialize)]
#[serde(default)]
struct StoredProfile {
    xp: u64,
    gems: u64,
    stats: UserStats,
    achievements: Vec<String>,
}

impl Default for StoredProfile {
    fn default() -> Self {
        Self {
            xp: 0,
            gems: 0,
            stats: UserStats::default(),
            achievements: Vec::new(),
        }
    }
}

impl From<StoredProfile> for GamificationProfile {
    fn from(stored: StoredProfile) -> Self {
        let mut achievements: Vec<String> = Vec::with_capacity(stored.achievements.len());
        for id in stored.achievements {
            if !achievements.contains(&id) {
                achievements.push(id);
            }
        }
        Self {
            xp: stored.xp,
            gems: stored.gems,
            level: level_for(stored.xp),
            stats: stored.stats,
            achievements,
        }
    }
}

impl Default for GamificationProfile {
    fn default() -> Self {
        StoredProfile::default().into()
    }
}

pub fn level_for(xp: u64) -> u64 {
    1 + xp / XP_PER_LEVEL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub current: u64,
    pub max: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AttemptResult {
    pub leveled_up: bool,
    pub new_achievements: Vec<&'static AchievementDef>,
}

impl GamificationProfile {
    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn gems(&self) -> u64 {
        self.gems
    }

    pub fn level(&self) -> u64 {
        self.level
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn achievements(&self) -> &[String] {
        &self.achievements
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|unlocked| unlocked == id)
    }

    /// Adds xp and reports whether the level went up.
    pub fn add_xp(&mut self, amount: u64) -> bool {
        let old_level = self.level;
        self.xp = self.xp.saturating_add(amount);
        self.level = level_for(self.xp);
        self.level > old_level
    }

    pub fn add_gems(&mut self, amount: u64) {
        self.gems = self.gems.saturating_add(amount);
    }

    pub fn record_attempt(&mut self, correct: bool) -> AttemptResult {
        self.stats.total_attempts += 1;
        let mut leveled_up = false;

        if correct {
            self.stats.total_correct += 1;
            self.stats.current_streak += 1;
            if self.stats.current_streak > self.stats.best_streak {
                self.stats.best_streak = self.stats.current_streak;
            }
            leveled_up = self.add_xp(XP_PER_CORRECT);
        } else {
            self.stats.current_streak = 0;
        }

        let new_achievements = self.check_achievements();
        AttemptResult {
            leveled_up,
            new_achievements,
        }
    }

    /// Unlocks every catalog entry whose condition now holds. Already
    /// unlocked ids are never added twice.
    pub fn check_achievements(&mut self) -> Vec<&'static AchievementDef> {
        let mut unlocked = Vec::new();
        for def in STAT_ACHIEVEMENTS.iter() {
            if !self.has_achievement(def.id) && (def.condition)(&self.stats) {
                self.achievements.push(def.id.to_string());
                unlocked.push(def);
            }
        }
        unlocked
    }

    pub fn next_level_progress(&self) -> LevelProgress {
        LevelProgress {
            current: self.xp % XP_PER_LEVEL,
            max: XP_PER_LEVEL,
        }
    }
}

/// Where the profile lives between runs.
pub trait ProfileRepository {
    fn load_profile(&self) -> Result<Option<GamificationProfile>, StoreError>;
    fn store_profile(&self, profile: &GamificationProfile) -> Result<(), StoreError>;
}

/// Owns the live profile and writes it back after every change.
///
/// Load problems fall back to a fresh profile and save problems are logged;
/// neither reaches the caller.
pub struct ProfileTracker<R: ProfileRepository = Store> {
    repo: Arc<R>,
    profile: GamificationProfile,
}

impl<R: ProfileRepository> ProfileTracker<R> {
    pub fn load(repo: Arc<R>) -> Self {
        let profile = match repo.load_profile() {
            Ok(Some(profile)) => profile,
            Ok(None) => GamificationProfile::default(),
            Err(error) => {
                tracing::warn!(error = %error, "Failed to load gamification profile, starting fresh");
                GamificationProfile::default()
            }
        };
        Self { repo, profile }
    }

    pub fn profile(&self) -> &GamificationProfile {
        &self.profile
    }

    pub fn record_attempt(&mut self, correct: bool) -> AttemptResult {
        let result = self.profile.record_attempt(correct);
        if result.leveled_up {
            tracing::info!(level = self.profile.level, xp = self.profile.xp, "Level up");
        }
        for def in &result.new_achievements {
            tracing::info!(achievement = def.id, "Achievement unlocked");
        }
        self.persist();
        result
    }

    pub fn add_xp(&mut self, amount: u64) -> bool {
        let leveled_up = self.profile.add_xp(amount);
        self.persist();
        leveled_up
    }

    pub fn add_gems(&mut self, amount: u64) {
        self.profile.add_gems(amount);
        self.persist();
    }

    fn persist(&self) {
        if let Err(error) = self.repo.store_profile(&self.profile) {
            tracing::error!(error = %error, "Failed to save gamification profile");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryRepo {
        saved: Mutex<Vec<GamificationProfile>>,
        fail_saves: bool,
    }

    impl ProfileRepository for MemoryRepo {
        fn load_profile(&self) -> Result<Option<GamificationProfile>, StoreError> {
            Ok(self.saved.lock().unwrap().last().cloned())
        }

        fn store_profile(&self, profile: &GamificationProfile) -> Result<(), StoreError> {
            if self.fail_saves {
                return Err(StoreError::Migration {
                    version: 0,
                    message: "read-only".to_string(),
                });
            }
            self.saved.lock().unwrap().push(profile.clone());
            Ok(())
        }
    }

    struct BrokenRepo;

    impl ProfileRepository for BrokenRepo {
        fn load_profile(&self) -> Result<Option<GamificationProfile>, StoreError> {
            Err(serde_json::from_str::<GamificationProfile>("{").unwrap_err().into())
        }

        fn store_profile(&self, _profile: &GamificationProfile) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn crossing_a_hundred_xp_levels_up() {
        let mut profile = GamificationProfile::default();
        assert!(!profile.add_xp(95));
        assert_eq!(profile.level(), 1);
        assert!(profile.add_xp(10));
        assert_eq!(profile.xp(), 105);
        assert_eq!(profile.level(), 2);
        assert_eq!(
            profile.next_level_progress(),
            LevelProgress { current: 5, max: 100 }
        );
    }

    #[test]
    fn wrong_answer_resets_streak_but_keeps_best() {
        let mut profile = GamificationProfile::default();
        for _ in 0..3 {
            profile.record_attempt(true);
        }
        profile.record_attempt(false);
        profile.record_attempt(true);

        let stats = profile.stats();
        assert_eq!(stats.total_attempts, 5);
        assert_eq!(stats.total_correct, 4);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.best_streak, 3);
        assert_eq!(profile.xp(), 40);
    }

    #[test]
    fn achievements_unlock_once_in_catalog_order() {
        let mut profile = GamificationProfile::default();
        let mut unlocked_at = Vec::new();
        for call in 1..=11 {
            let result = profile.record_attempt(true);
            for def in result.new_achievements {
                unlocked_at.push((call, def.id));
            }
        }
        assert_eq!(
            unlocked_at,
            vec![
                (1, "first_step"),
                (5, "on_fire"),
                (10, "scholar"),
                (10, "unstoppable"),
            ]
        );
        assert_eq!(
            profile.achievements(),
            &["first_step", "on_fire", "scholar", "unstoppable"]
        );
    }

    #[test]
    fn parsing_recomputes_level_and_fills_defaults() {
        let profile: GamificationProfile =
            serde_json::from_str(r#"{"xp": 230, "level": 1, "stats": {"total_correct": 4}}"#)
                .unwrap();
        assert_eq!(profile.level(), 3);
        assert_eq!(profile.gems(), 0);
        assert_eq!(profile.stats().total_correct, 4);
        assert_eq!(profile.stats().best_streak, 0);
        assert!(profile.achievements().is_empty());
    }

    #[test]
    fn tracker_saves_after_every_mutation() {
        let repo = Arc::new(MemoryRepo::default());
        let mut tracker = ProfileTracker::load(repo.clone());

        tracker.record_attempt(true);
        tracker.add_gems(3);
        assert!(!tracker.add_xp(5));

        let saved = repo.saved.lock().unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[2].gems(), 3);
        assert_eq!(saved[2].xp(), 15);
    }

    #[test]
    fn tracker_swallows_save_failures() {
        let repo = Arc::new(MemoryRepo {
            fail_saves: true,
            ..MemoryRepo::default()
        });
        let mut tracker = ProfileTracker::load(repo);
        let result = tracker.record_attempt(true);
        assert_eq!(result.new_achievements.len(), 1);
        assert_eq!(tracker.profile().xp(), 10);
    }

    #[test]
    fn tracker_starts_fresh_on_corrupt_profile() {
        let tracker = ProfileTracker::load(Arc::new(BrokenRepo));
        assert_eq!(tracker.profile(), &GamificationProfile::default());
    }
}
