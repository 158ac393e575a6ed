use std::sync::Arc;

use serde::Serialize;

use crate::constants::{ACCURACY_PENALTY_PER_MISTAKE, MILLIS_PER_SECOND};
use crate::store::operations::attempts::AttemptStats;
use crate::store::{Store, StoreError};

/// End-of-chain report built from the group's ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSummary {
    pub total_time_ms: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub mistakes: u32,
    pub completed: u32,
    /// `max(0, 100 - mistakes * 10)`.
    pub accuracy: u32,
}

impl ChainSummary {
    pub fn from_totals(total_time_ms: u64, mistakes: u32, completed: u32) -> Self {
        let total_seconds = total_time_ms / MILLIS_PER_SECOND;
        let penalty = mistakes.saturating_mul(ACCURACY_PENALTY_PER_MISTAKE);
        Self {
            total_time_ms,
            minutes: total_seconds / 60,
            seconds: total_seconds % 60,
            mistakes,
            completed,
            accuracy: 100_u32.saturating_sub(penalty),
        }
    }
}

impl From<AttemptStats> for ChainSummary {
    fn from(stats: AttemptStats) -> Self {
        Self::from_totals(stats.total_time, stats.mistakes, stats.completed)
    }
}

/// Per-group ledger of one pass through a chain.
#[derive(Clone)]
pub struct AttemptRecorder {
    store: Arc<Store>,
}

impl AttemptRecorder {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Current ledger for `group`, or zeros when it is absent or unreadable.
    pub fn current(&self, group: &str) -> Result<AttemptStats, StoreError> {
        match self.store.get_attempt_stats(group) {
            Ok(stats) => Ok(stats.unwrap_or_default()),
            Err(error) if error.is_malformed() => {
                tracing::warn!(group, error = %error, "Malformed attempt ledger, starting from zero");
                Ok(AttemptStats::default())
            }
            Err(error) => Err(error),
        }
    }

    /// Adds one completed lesson to the group's ledger and returns the new totals.
    pub fn record(
        &self,
        group: &str,
        elapsed_ms: u64,
        mistakes: u32,
    ) -> Result<AttemptStats, StoreError> {
        let mut stats = self.current(group)?;
        stats.absorb(elapsed_ms, mistakes);
        self.store.set_attempt_stats(group, &stats)?;
        tracing::debug!(
            group,
            elapsed_ms,
            mistakes,
            completed = stats.completed,
            "Attempt recorded"
        );
        Ok(stats)
    }

    pub fn summary(&self, group: &str) -> Result<ChainSummary, StoreError> {
        Ok(self.current(group)?.into())
    }

    /// Drops the ledger once its summary has been dismissed.
    pub fn clear(&self, group: &str) -> Result<(), StoreError> {
        self.store.delete_attempt_stats(group)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn recorder() -> (tempfile::TempDir, AttemptRecorder) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        (dir, AttemptRecorder::new(Arc::new(store)))
    }

    #[test]
    fn merges_are_additive() {
        let (_dir, recorder) = recorder();

        let first = recorder.record("g", 1000, 1).unwrap();
        assert_eq!(
            first,
            AttemptStats {
                total_time: 1000,
                mistakes: 1,
                completed: 1
            }
        );
        let second = recorder.record("g", 1000, 1).unwrap();
        assert_eq!(
            second,
            AttemptStats {
                total_time: 2000,
                mistakes: 2,
                completed: 2
            }
        );
    }

    #[test]
    fn corrupt_ledger_counts_as_empty() {
        let (_dir, recorder) = recorder();
        recorder
            .store
            .attempt_stats
            .insert("stats_g", &b"not json"[..])
            .unwrap();

        let stats = recorder.record("g", 500, 0).unwrap();
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.total_time, 500);
    }

    #[test]
    fn summary_breaks_time_down_and_clear_resets() {
        let (_dir, recorder) = recorder();
        recorder.record("g", 95_400, 3).unwrap();

        let summary = recorder.summary("g").unwrap();
        assert_eq!(summary.minutes, 1);
        assert_eq!(summary.seconds, 35);
        assert_eq!(summary.accuracy, 70);
        assert_eq!(summary.completed, 1);

        recorder.clear("g").unwrap();
        assert_eq!(recorder.summary("g").unwrap().completed, 0);
    }

    #[test]
    fn accuracy_never_goes_negative() {
        assert_eq!(ChainSummary::from_totals(0, 12, 4).accuracy, 0);
        assert_eq!(ChainSummary::from_totals(0, 0, 4).accuracy, 100);
    }
}
