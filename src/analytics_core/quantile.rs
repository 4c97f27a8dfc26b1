//! Value-weighted quantile distribution of users by coin holdings
//!
//! Percentiles here are computed over the coin mass, not the user count: a
//! threshold answers "what per-user total captures the bottom X% of all
//! coins". This measures wealth concentration rather than being a plain
//! order-statistic percentile of users.

use super::record::TransactionRecord;
use super::stats::effective_chunk_size;
use serde::Serialize;
use std::collections::HashMap;

/// Cumulative coin-mass fractions at which thresholds are captured.
const PERCENTILE_TARGETS: [f64; 4] = [0.25, 0.50, 0.70, 0.90];

/// One of the five user cohorts bounded by the percentile thresholds.
///
/// `range_low`/`range_high` reuse the computed thresholds; when two adjacent
/// thresholds coincide the bucket between them is degenerate (its range
/// collapses to a point and it may hold zero users).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantileBucket {
    pub user_count: usize,
    pub coin_sum: f64,
    pub range_low: f64,
    pub range_high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantileDistribution {
    pub p25: f64,
    pub p50: f64,
    pub p70: f64,
    pub p90: f64,
    pub buckets: [QuantileBucket; 5],
}

/// Compute coin-mass percentile thresholds and the five-bucket partition.
///
/// 1. Aggregate coins per distinct user.
/// 2. Sort users ascending by total.
/// 3. Walk the sorted users accumulating a running sum; each threshold is the
///    total of the first user at which `running / total_coins` reaches the
///    target fraction. All thresholds are 0 when total coins is 0.
/// 4. Partition users with inclusive upper bounds: `≤ p25`, `(p25, p50]`,
///    `(p50, p70]`, `(p70, p90]`, `> p90`.
pub fn quantile_distribution(
    records: &[TransactionRecord],
    chunk_size: usize,
) -> QuantileDistribution {
    let mut user_totals: HashMap<&str, f64> = HashMap::new();
    let mut total_coins = 0.0;

    for chunk in records.chunks(effective_chunk_size(chunk_size)) {
        for record in chunk {
            *user_totals.entry(record.user_id.as_str()).or_insert(0.0) += record.coins;
            total_coins += record.coins;
        }
    }

    let mut entries: Vec<(&str, f64)> = user_totals.into_iter().collect();
    entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut thresholds = [0.0f64; 4];
    if total_coins != 0.0 {
        let mut captured = [false; 4];
        let mut running = 0.0;
        for (_, user_total) in &entries {
            running += user_total;
            let fraction = running / total_coins;
            for (i, target) in PERCENTILE_TARGETS.iter().enumerate() {
                if !captured[i] && fraction >= *target {
                    thresholds[i] = *user_total;
                    captured[i] = true;
                }
            }
        }
    }

    let [p25, p50, p70, p90] = thresholds;
    let max_user_total = entries.last().map(|(_, total)| *total).unwrap_or(0.0);

    let mut buckets = [
        QuantileBucket { user_count: 0, coin_sum: 0.0, range_low: 0.0, range_high: p25 },
        QuantileBucket { user_count: 0, coin_sum: 0.0, range_low: p25, range_high: p50 },
        QuantileBucket { user_count: 0, coin_sum: 0.0, range_low: p50, range_high: p70 },
        QuantileBucket { user_count: 0, coin_sum: 0.0, range_low: p70, range_high: p90 },
        QuantileBucket { user_count: 0, coin_sum: 0.0, range_low: p90, range_high: max_user_total },
    ];

    for (_, user_total) in &entries {
        let index = if *user_total <= p25 {
            0
        } else if *user_total <= p50 {
            1
        } else if *user_total <= p70 {
            2
        } else if *user_total <= p90 {
            3
        } else {
            4
        };
        buckets[index].user_count += 1;
        buckets[index].coin_sum += user_total;
    }

    QuantileDistribution { p25, p50, p70, p90, buckets }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(user: &str, coins: f64) -> TransactionRecord {
        TransactionRecord {
            user_id: user.to_string(),
            coins,
            action: "buy_gift".to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn test_worked_example_thresholds() {
        // Four users with totals [1, 2, 3, 4], total 10.
        // Cumulative fractions: 0.1, 0.3, 0.6, 1.0.
        let records: Vec<TransactionRecord> =
            [1.0, 2.0, 3.0, 4.0].iter().enumerate().map(|(i, c)| make_record(&format!("u{i}"), *c)).collect();
        let dist = quantile_distribution(&records, 0);
        assert_eq!(dist.p25, 2.0);
        assert_eq!(dist.p50, 3.0);
        assert_eq!(dist.p70, 4.0);
        assert_eq!(dist.p90, 4.0);
    }

    #[test]
    fn test_worked_example_partition() {
        // Inclusive upper bounds: users 1 and 2 are both ≤ p25 = 2, user 3
        // lands in (2, 3], user 4 in (3, 4], and (4, 4] is degenerate.
        let records: Vec<TransactionRecord> =
            [1.0, 2.0, 3.0, 4.0].iter().enumerate().map(|(i, c)| make_record(&format!("u{i}"), *c)).collect();
        let dist = quantile_distribution(&records, 0);

        let counts: Vec<usize> = dist.buckets.iter().map(|b| b.user_count).collect();
        assert_eq!(counts, vec![2, 1, 1, 0, 0]);
        let sums: Vec<f64> = dist.buckets.iter().map(|b| b.coin_sum).collect();
        assert_eq!(sums, vec![3.0, 3.0, 4.0, 0.0, 0.0]);

        // Degenerate bucket between equal thresholds collapses to a point.
        assert_eq!(dist.buckets[3].range_low, dist.buckets[3].range_high);
    }

    #[test]
    fn test_thresholds_are_monotone() {
        let records: Vec<TransactionRecord> = (0..50)
            .map(|i| make_record(&format!("u{i}"), (i * i) as f64 * 0.25 + 1.0))
            .collect();
        let dist = quantile_distribution(&records, 0);
        assert!(dist.p25 <= dist.p50);
        assert!(dist.p50 <= dist.p70);
        assert!(dist.p70 <= dist.p90);
    }

    #[test]
    fn test_buckets_partition_users_and_coins() {
        let records: Vec<TransactionRecord> = (0..37)
            .flat_map(|i| {
                let user = format!("u{i}");
                vec![make_record(&user, i as f64), make_record(&user, 3.5)]
            })
            .collect();
        let dist = quantile_distribution(&records, 0);

        let user_count: usize = dist.buckets.iter().map(|b| b.user_count).sum();
        assert_eq!(user_count, 37);

        let coin_sum: f64 = dist.buckets.iter().map(|b| b.coin_sum).sum();
        let total: f64 = records.iter().map(|r| r.coins).sum();
        assert!((coin_sum - total).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_coins_yields_zero_thresholds() {
        let records = vec![make_record("u1", 0.0), make_record("u2", 0.0)];
        let dist = quantile_distribution(&records, 0);
        assert_eq!((dist.p25, dist.p50, dist.p70, dist.p90), (0.0, 0.0, 0.0, 0.0));
        // All users still land in bucket 1 (0 ≤ p25).
        assert_eq!(dist.buckets[0].user_count, 2);
    }

    #[test]
    fn test_empty_records() {
        let dist = quantile_distribution(&[], 0);
        assert_eq!(dist.p90, 0.0);
        assert!(dist.buckets.iter().all(|b| b.user_count == 0 && b.coin_sum == 0.0));
    }

    #[test]
    fn test_single_user_holds_everything() {
        let records = vec![make_record("whale", 500.0)];
        let dist = quantile_distribution(&records, 0);
        // The first user crosses every target at once.
        assert_eq!((dist.p25, dist.p50, dist.p70, dist.p90), (500.0, 500.0, 500.0, 500.0));
        assert_eq!(dist.buckets[0].user_count, 1);
        assert_eq!(dist.buckets[4].user_count, 0);
    }

    #[test]
    fn test_chunk_size_independence() {
        let records: Vec<TransactionRecord> = (0..200)
            .map(|i| make_record(&format!("u{}", i % 23), (i % 11) as f64))
            .collect();
        let whole = quantile_distribution(&records, 0);
        for chunk_size in [1, 7, 64] {
            assert_eq!(quantile_distribution(&records, chunk_size), whole);
        }
    }
}
