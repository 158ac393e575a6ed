pub const PROFILE: &str = "profile";
pub const ATTEMPT_STATS: &str = "attempt_stats";
pub const PREFERENCES: &str = "preferences";
pub const META: &str = "meta";
