use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

/// Running totals for one pass through a chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttemptStats {
    /// Milliseconds spent across the completed lessons.
    pub total_time: u64,
    pub mistakes: u32,
    pub completed: u32,
}

impl AttemptStats {
    pub fn absorb(&mut self, elapsed_ms: u64, mistakes: u32) {
        self.total_time = self.total_time.saturating_add(elapsed_ms);
        self.mistakes = self.mistakes.saturating_add(mistakes);
        self.completed = self.completed.saturating_add(1);
    }
}

impl Store {
    pub fn get_attempt_stats(&self, group: &str) -> Result<Option<AttemptStats>, StoreError> {
        Self::read(&self.attempt_stats, &keys::attempt_stats_key(group))
    }

    pub fn set_attempt_stats(&self, group: &str, stats: &AttemptStats) -> Result<(), StoreError> {
        Self::write(&self.attempt_stats, &keys::attempt_stats_key(group), stats)
    }

    pub fn delete_attempt_stats(&self, group: &str) -> Result<(), StoreError> {
        self.attempt_stats
            .remove(keys::attempt_stats_key(group).as_bytes())?;
        Ok(())
    }

    /// Every readable ledger, keyed by group. Unreadable entries are skipped.
    pub fn list_attempt_stats(&self) -> Result<Vec<(String, AttemptStats)>, StoreError> {
        let mut out = Vec::new();
        for item in self
            .attempt_stats
            .scan_prefix(keys::ATTEMPT_STATS_PREFIX.as_bytes())
        {
            let (key, raw) = item?;
            let key = String::from_utf8_lossy(&key).into_owned();
            let Some(group) = keys::group_from_attempt_stats_key(&key) else {
                continue;
            };
            match Self::deserialize::<AttemptStats>(&raw) {
                Ok(stats) => out.push((group.to_string(), stats)),
                Err(error) => {
                    tracing::warn!(group, error = %error, "Skipping malformed attempt ledger");
                }
            }
        }
        Ok(out)
    }
}
