//! Analytics Core - Aggregation Engine
//!
//! Pure, stateless computations over in-memory transaction record sets.
//! Every operation takes an already-filtered slice of records and returns a
//! value; nothing in this module performs I/O or mutates shared state.
//!
//! # Architecture
//!
//! ```text
//! Vec<TransactionRecord> → RecordFilter (welcome-bonus toggle)
//!     ↓
//! stats (unique users, total coins, per-action breakdown)
//! distribution (coin share per action, friendly labels)
//! quantile (coin-mass percentile thresholds + 5 buckets)
//! timeline (per-UTC-minute coin totals)
//!     ↓
//! AggregateSnapshot → Presentation (read-only JSON)
//! ```

pub mod distribution;
pub mod quantile;
pub mod record;
pub mod snapshot;
pub mod stats;
pub mod timeline;

pub use distribution::{friendly_action_label, pie_distribution, PieSlice};
pub use quantile::{quantile_distribution, QuantileBucket, QuantileDistribution};
pub use record::{RecordFilter, TransactionRecord, DEFAULT_CHUNK_SIZE, WELCOME_BONUS_ACTION};
pub use snapshot::{compute_snapshot, AggregateSnapshot};
pub use stats::{action_stats, summary_stats, ActionStats, SummaryStats};
pub use timeline::{timeline_buckets, TimelineBreakdown, TimelineBucket};
