pub const PROFILE_KEY: &str = "physicode_user_profile";

pub const ATTEMPT_STATS_PREFIX: &str = "stats_";

pub const UNLOCKED_ACHIEVEMENTS_KEY: &str = "achievements";
pub const DISPLAY_PROFILE_KEY: &str = "userProfile";
pub const SELECTED_SUBJECT_KEY: &str = "selectedSubject";

pub const VERSION_KEY: &str = "_meta:version";

pub fn attempt_stats_key(group: &str) -> String {
    format!("{}{}", ATTEMPT_STATS_PREFIX, group)
}

pub fn group_from_attempt_stats_key(key: &str) -> Option<&str> {
    key.strip_prefix(ATTEMPT_STATS_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_stats_key_round_trips_group() {
        let key = attempt_stats_key("Python-Fundamentos-Algoritmos");
        assert_eq!(key, "stats_Python-Fundamentos-Algoritmos");
        assert_eq!(
            group_from_attempt_stats_key(&key),
            Some("Python-Fundamentos-Algoritmos")
        );
        assert_eq!(group_from_attempt_stats_key("userProfile"), None);
    }
}
