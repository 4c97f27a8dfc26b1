//! On-demand aggregate snapshot: everything Presentation reads for one report

use super::distribution::{pie_distribution, PieSlice};
use super::quantile::{quantile_distribution, QuantileDistribution};
use super::record::{RecordFilter, TransactionRecord};
use super::stats::{action_stats, summary_stats, ActionStats};
use super::timeline::{timeline_buckets, TimelineBreakdown, TimelineBucket};
use serde::Serialize;

/// Derived analytics for one record set under one filter. Recomputed on
/// demand, never persisted; purely a function of `(records, filter)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSnapshot {
    pub unique_users: usize,
    pub total_coins: f64,
    pub avg_coins_per_user: f64,
    pub per_action_stats: Vec<ActionStats>,
    pub pie_distribution: Vec<PieSlice>,
    pub quantile: QuantileDistribution,
    pub timeline: Vec<TimelineBucket>,
}

/// Apply the filter once, then run all four aggregations over the survivors.
pub fn compute_snapshot(
    records: &[TransactionRecord],
    filter: &RecordFilter,
    chunk_size: usize,
) -> AggregateSnapshot {
    let filtered = filter.apply(records);
    let headline = summary_stats(&filtered, chunk_size);

    AggregateSnapshot {
        unique_users: headline.unique_users,
        total_coins: headline.total_coins,
        avg_coins_per_user: headline.avg_coins_per_user,
        per_action_stats: action_stats(&filtered, chunk_size),
        pie_distribution: pie_distribution(&filtered, chunk_size),
        quantile: quantile_distribution(&filtered, chunk_size),
        timeline: timeline_buckets(&filtered, TimelineBreakdown::TotalsOnly, chunk_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(user: &str, coins: f64, action: &str, ts: Option<f64>) -> TransactionRecord {
        TransactionRecord {
            user_id: user.to_string(),
            coins,
            action: action.to_string(),
            timestamp: ts,
        }
    }

    fn sample_records() -> Vec<TransactionRecord> {
        vec![
            make_record("u1", 10.0, "buy_gift", Some(60.0)),
            make_record("u1", 5.0, "redeem_bonus", Some(65.0)),
            make_record("u2", 100.0, "buy_gift", Some(121.0)),
            make_record("u3", 2.0, "grant_widget_bonus", None),
        ]
    }

    #[test]
    fn test_snapshot_respects_bonus_filter() {
        let records = sample_records();
        let with_bonus = compute_snapshot(&records, &RecordFilter::with_bonus(true), 0);
        assert_eq!(with_bonus.unique_users, 3);
        assert_eq!(with_bonus.total_coins, 117.0);

        let without = compute_snapshot(&records, &RecordFilter::with_bonus(false), 0);
        assert_eq!(without.unique_users, 3);
        assert_eq!(without.total_coins, 112.0);
        assert!(without.per_action_stats.iter().all(|s| s.action != "redeem_bonus"));
        assert!(without.pie_distribution.iter().all(|s| s.action != "redeem_bonus"));
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let records = sample_records();
        let filter = RecordFilter::with_bonus(false);
        let first = compute_snapshot(&records, &filter, 0);
        let second = compute_snapshot(&records, &filter, 0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_snapshot_chunk_size_independent() {
        let records: Vec<TransactionRecord> = (0..250)
            .map(|i| {
                make_record(
                    &format!("u{}", i % 17),
                    (i % 13) as f64,
                    if i % 3 == 0 { "buy_gift" } else { "redeem_bonus" },
                    Some((i * 30) as f64),
                )
            })
            .collect();
        let filter = RecordFilter::include_all();
        let whole = compute_snapshot(&records, &filter, 0);
        for chunk_size in [1, 9, 100] {
            assert_eq!(compute_snapshot(&records, &filter, chunk_size), whole);
        }
    }

    #[test]
    fn test_cross_section_totals_agree() {
        let records = sample_records();
        let snapshot = compute_snapshot(&records, &RecordFilter::include_all(), 0);

        let action_total: f64 = snapshot.per_action_stats.iter().map(|s| s.total_coins).sum();
        assert!((action_total - snapshot.total_coins).abs() < 1e-9);

        let pie_total: f64 = snapshot.pie_distribution.iter().map(|s| s.total_coins).sum();
        assert!((pie_total - snapshot.total_coins).abs() < 1e-9);

        let bucket_users: usize = snapshot.quantile.buckets.iter().map(|b| b.user_count).sum();
        assert_eq!(bucket_users, snapshot.unique_users);

        // Timeline only covers records with a timestamp.
        let timestamped: f64 = records
            .iter()
            .filter(|r| r.timestamp.is_some())
            .map(|r| r.coins)
            .sum();
        let timeline_total: f64 = snapshot.timeline.iter().map(|b| b.total_coins).sum();
        assert!((timeline_total - timestamped).abs() < 1e-9);
    }

    #[test]
    fn test_empty_snapshot_is_all_zeroes() {
        let snapshot = compute_snapshot(&[], &RecordFilter::include_all(), 0);
        assert_eq!(snapshot.unique_users, 0);
        assert_eq!(snapshot.total_coins, 0.0);
        assert_eq!(snapshot.avg_coins_per_user, 0.0);
        assert!(snapshot.per_action_stats.is_empty());
        assert!(snapshot.pie_distribution.is_empty());
        assert!(snapshot.timeline.is_empty());
    }
}
