//! Categorical coin distribution across action codes

use super::record::{TransactionRecord, DEFAULT_CHUNK_SIZE};
use serde::Serialize;
use std::collections::HashMap;

/// Resolve an action code to its user-facing label.
///
/// Codes absent from the dictionary fall back to the raw code unchanged, so
/// the action vocabulary stays open-ended.
pub fn friendly_action_label(action: &str) -> &str {
    match action {
        "redeem_bonus" => "Welcome Bonus",
        "buy_gift" => "Gift Sent",
        "grant_widget_bonus" => "Poll Vote",
        other => other,
    }
}

/// One slice of the categorical distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub action: String,
    pub friendly_label: String,
    pub total_coins: f64,
}

/// Sum coins per distinct action, slices in first-encounter order.
pub fn pie_distribution(records: &[TransactionRecord], chunk_size: usize) -> Vec<PieSlice> {
    let chunk_size = if chunk_size == 0 { DEFAULT_CHUNK_SIZE } else { chunk_size };

    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for chunk in records.chunks(chunk_size) {
        for record in chunk {
            let total = totals.entry(record.action.as_str()).or_insert_with(|| {
                order.push(record.action.as_str());
                0.0
            });
            *total += record.coins;
        }
    }

    order
        .into_iter()
        .map(|action| PieSlice {
            action: action.to_string(),
            friendly_label: friendly_action_label(action).to_string(),
            total_coins: totals[action],
        })
        .collect()
}
