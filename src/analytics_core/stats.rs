//! Summary statistics and per-action breakdown

use super::record::{round2, TransactionRecord, DEFAULT_CHUNK_SIZE};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Headline numbers for a record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub unique_users: usize,
    pub total_coins: f64,
    /// `total_coins / unique_users` rounded to 2 decimals; 0 with no users.
    pub avg_coins_per_user: f64,
}

/// Per-action aggregate row, sorted descending by total coins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionStats {
    pub action: String,
    pub unique_users: usize,
    pub total_coins: f64,
    pub transaction_count: usize,
    pub avg_coins_per_user: f64,
}

pub(crate) fn effective_chunk_size(chunk_size: usize) -> usize {
    if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    }
}

/// Compute unique users, total coins, and the rounded per-user average.
pub fn summary_stats(records: &[TransactionRecord], chunk_size: usize) -> SummaryStats {
    let mut users: HashSet<&str> = HashSet::new();
    let mut total_coins = 0.0;

    for chunk in records.chunks(effective_chunk_size(chunk_size)) {
        for record in chunk {
            users.insert(record.user_id.as_str());
            total_coins += record.coins;
        }
    }

    let unique_users = users.len();
    let avg_coins_per_user = if unique_users > 0 {
        round2(total_coins / unique_users as f64)
    } else {
        0.0
    };

    SummaryStats {
        unique_users,
        total_coins,
        avg_coins_per_user,
    }
}

/// Group records by action and aggregate each group.
///
/// Groups appear in first-encounter order, then sort descending by total
/// coins. The sort is stable, so ties keep encounter order.
pub fn action_stats(records: &[TransactionRecord], chunk_size: usize) -> Vec<ActionStats> {
    struct Group<'a> {
        users: HashSet<&'a str>,
        total_coins: f64,
        transaction_count: usize,
    }

    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Group> = HashMap::new();

    for chunk in records.chunks(effective_chunk_size(chunk_size)) {
        for record in chunk {
            let group = groups.entry(record.action.as_str()).or_insert_with(|| {
                order.push(record.action.as_str());
                Group {
                    users: HashSet::new(),
                    total_coins: 0.0,
                    transaction_count: 0,
                }
            });
            group.users.insert(record.user_id.as_str());
            group.total_coins += record.coins;
            group.transaction_count += 1;
        }
    }

    let mut rows: Vec<ActionStats> = order
        .into_iter()
        .map(|action| {
            let group = &groups[action];
            let unique_users = group.users.len();
            let avg = if unique_users > 0 {
                round2(group.total_coins / unique_users as f64)
            } else {
                0.0
            };
            ActionStats {
                action: action.to_string(),
                unique_users,
                total_coins: group.total_coins,
                transaction_count: group.transaction_count,
                avg_coins_per_user: avg,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_coins
            .partial_cmp(&a.total_coins)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}
