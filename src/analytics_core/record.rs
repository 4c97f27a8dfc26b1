//! Normalized transaction records and the action filter predicate

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Action code for the welcome bonus granted on signup.
///
/// Excluded from every aggregation when the bonus toggle is off.
pub const WELCOME_BONUS_ACTION: &str = "redeem_bonus";

/// Records are processed in fixed-size chunks to bound per-step latency on
/// large datasets. Chunking never changes computed results.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// One normalized transaction produced by ingestion.
///
/// Immutable once produced: ingestion guarantees a non-empty `user_id` and
/// `action`, and coerces unparsable coin values to 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub user_id: String,
    pub coins: f64,
    pub action: String,
    /// Epoch seconds. Records without a timestamp are skipped by the timeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

/// Configuration predicate deciding which actions participate in aggregation.
///
/// Modeled as an exclusion set rather than a baked-in string comparison so
/// additional rules can be added without touching the engine.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    excluded_actions: HashSet<String>,
}

impl RecordFilter {
    /// Filter that lets every action through.
    pub fn include_all() -> Self {
        Self::default()
    }

    /// Standard dashboard toggle: when `include_bonus` is false, welcome
    /// bonus transactions are excluded from every computation.
    pub fn with_bonus(include_bonus: bool) -> Self {
        let mut filter = Self::default();
        if !include_bonus {
            filter.excluded_actions.insert(WELCOME_BONUS_ACTION.to_string());
        }
        filter
    }

    /// Add another excluded action code.
    pub fn exclude_action(mut self, action: &str) -> Self {
        self.excluded_actions.insert(action.to_string());
        self
    }

    pub fn includes(&self, action: &str) -> bool {
        !self.excluded_actions.contains(action)
    }

    /// Apply the predicate to a record set, preserving order.
    pub fn apply(&self, records: &[TransactionRecord]) -> Vec<TransactionRecord> {
        if self.excluded_actions.is_empty() {
            return records.to_vec();
        }
        records
            .iter()
            .filter(|r| self.includes(&r.action))
            .cloned()
            .collect()
    }
}

/// Round to 2 decimal places, the display precision used for all per-user
/// coin averages.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(user: &str, coins: f64, action: &str) -> TransactionRecord {
        TransactionRecord {
            user_id: user.to_string(),
            coins,
            action: action.to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn test_bonus_filter_excludes_redeem_bonus() {
        let records = vec![
            make_record("u1", 10.0, "buy_gift"),
            make_record("u1", 5.0, WELCOME_BONUS_ACTION),
            make_record("u2", 100.0, "buy_gift"),
        ];

        let kept = RecordFilter::with_bonus(false).apply(&records);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.action == "buy_gift"));

        let all = RecordFilter::with_bonus(true).apply(&records);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_filter_is_extensible() {
        let records = vec![
            make_record("u1", 1.0, "buy_gift"),
            make_record("u2", 2.0, "grant_widget_bonus"),
        ];
        let filter = RecordFilter::include_all().exclude_action("grant_widget_bonus");
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].user_id, "u1");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(55.0), 55.0);
        assert_eq!(round2(36.666_666), 36.67);
        assert_eq!(round2(0.004), 0.0);
    }
}
