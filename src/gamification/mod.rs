pub mod achievements;
pub mod display;
pub mod profile;

pub use achievements::{AchievementDef, Milestone, MILESTONES, STAT_ACHIEVEMENTS};
pub use display::{Avatar, DisplayProfile, ProfileOverview};
pub use profile::{GamificationProfile, ProfileRepository, ProfileTracker, UserStats};
