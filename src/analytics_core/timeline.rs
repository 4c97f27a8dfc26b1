//! Per-minute time series of coin flow

use super::record::TransactionRecord;
use super::stats::effective_chunk_size;
use chrono::{TimeZone, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Whether buckets carry per-action sub-totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineBreakdown {
    TotalsOnly,
    PerAction,
}

/// Coin totals for one UTC minute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBucket {
    /// Bucket key: epoch seconds floored to the minute.
    pub minute: i64,
    /// `HH:MM` in UTC, for display.
    pub label: String,
    pub total_coins: f64,
    /// Per-action sub-totals. With `TimelineBreakdown::PerAction`, every
    /// distinct action of the whole record set appears in every bucket, 0
    /// when the bucket has no such records. Empty with `TotalsOnly`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub by_action: BTreeMap<String, f64>,
}

fn minute_label(minute: i64) -> String {
    Utc.timestamp_opt(minute, 0)
        .single()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Bucket records by UTC minute (`floor(timestamp / 60) * 60`).
///
/// Records with a missing or non-finite timestamp are skipped. The result is
/// ascending by bucket key with no duplicate keys.
pub fn timeline_buckets(
    records: &[TransactionRecord],
    breakdown: TimelineBreakdown,
    chunk_size: usize,
) -> Vec<TimelineBucket> {
    let actions: BTreeSet<&str> = match breakdown {
        TimelineBreakdown::TotalsOnly => BTreeSet::new(),
        TimelineBreakdown::PerAction => records.iter().map(|r| r.action.as_str()).collect(),
    };

    let mut buckets: BTreeMap<i64, (f64, BTreeMap<&str, f64>)> = BTreeMap::new();

    for chunk in records.chunks(effective_chunk_size(chunk_size)) {
        for record in chunk {
            let Some(timestamp) = record.timestamp else { continue };
            if !timestamp.is_finite() {
                continue;
            }
            let minute = (timestamp / 60.0).floor() as i64 * 60;

            let (total, by_action) = buckets.entry(minute).or_insert_with(|| {
                let zeroed = actions.iter().map(|a| (*a, 0.0)).collect();
                (0.0, zeroed)
            });
            *total += record.coins;
            if breakdown == TimelineBreakdown::PerAction {
                *by_action.entry(record.action.as_str()).or_insert(0.0) += record.coins;
            }
        }
    }

    buckets
        .into_iter()
        .map(|(minute, (total_coins, by_action))| TimelineBucket {
            minute,
            label: minute_label(minute),
            total_coins,
            by_action: by_action
                .into_iter()
                .map(|(action, coins)| (action.to_string(), coins))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(coins: f64, action: &str, timestamp: Option<f64>) -> TransactionRecord {
        TransactionRecord {
            user_id: "u1".to_string(),
            coins,
            action: action.to_string(),
            timestamp,
        }
    }

    #[test]
    fn test_buckets_by_utc_minute() {
        let records = vec![
            make_record(1.0, "buy_gift", Some(120.0)),
            make_record(2.0, "buy_gift", Some(150.0)),  // same minute as 120
            make_record(4.0, "buy_gift", Some(180.0)),
        ];
        let timeline = timeline_buckets(&records, TimelineBreakdown::TotalsOnly, 0);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].minute, 120);
        assert_eq!(timeline[0].total_coins, 3.0);
        assert_eq!(timeline[1].minute, 180);
        assert_eq!(timeline[1].total_coins, 4.0);
    }

    #[test]
    fn test_records_without_timestamp_are_skipped() {
        let records = vec![
            make_record(1.0, "buy_gift", Some(60.0)),
            make_record(99.0, "buy_gift", None),
            make_record(5.0, "buy_gift", Some(f64::NAN)),
        ];
        let timeline = timeline_buckets(&records, TimelineBreakdown::TotalsOnly, 0);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].total_coins, 1.0);
    }

    #[test]
    fn test_keys_strictly_ascending_and_unique() {
        let records: Vec<TransactionRecord> = (0..500)
            .map(|i| make_record(1.0, "buy_gift", Some((i * 37 % 600) as f64)))
            .collect();
        let timeline = timeline_buckets(&records, TimelineBreakdown::TotalsOnly, 0);
        for pair in timeline.windows(2) {
            assert!(pair[0].minute < pair[1].minute);
        }
        let bucket_total: f64 = timeline.iter().map(|b| b.total_coins).sum();
        assert!((bucket_total - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_per_action_breakdown_reports_zeroes() {
        let records = vec![
            make_record(3.0, "buy_gift", Some(0.0)),
            make_record(7.0, "redeem_bonus", Some(60.0)),
        ];
        let timeline = timeline_buckets(&records, TimelineBreakdown::PerAction, 0);
        assert_eq!(timeline.len(), 2);
        // Every bucket carries every action, absent ones at 0.
        assert_eq!(timeline[0].by_action["buy_gift"], 3.0);
        assert_eq!(timeline[0].by_action["redeem_bonus"], 0.0);
        assert_eq!(timeline[1].by_action["buy_gift"], 0.0);
        assert_eq!(timeline[1].by_action["redeem_bonus"], 7.0);
    }

    #[test]
    fn test_fractional_timestamps_floor_to_minute() {
        let records = vec![
            make_record(1.0, "buy_gift", Some(119.9)),
            make_record(2.0, "buy_gift", Some(60.0)),
        ];
        let timeline = timeline_buckets(&records, TimelineBreakdown::TotalsOnly, 0);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].minute, 60);
        assert_eq!(timeline[0].total_coins, 3.0);
    }

    #[test]
    fn test_minute_labels_are_utc_hh_mm() {
        // 1700000040 = 2023-11-14 22:14:00 UTC
        let records = vec![make_record(1.0, "buy_gift", Some(1_700_000_040.0))];
        let timeline = timeline_buckets(&records, TimelineBreakdown::TotalsOnly, 0);
        assert_eq!(timeline[0].label, "22:14");
    }
}
