//! Report Core - Report Lineage Manager
//!
//! Owns the collection of `Report` entities, their visibility and lineage,
//! and derives summary/meta-summary reports by combining record sets.
//!
//! # Architecture
//!
//! ```text
//! ingest_core → (file name, records) batches
//!     ↓
//! ReportStore (stable ids, flags, active selection)
//!     ├─ generate_summary      (common-prefix naming, sources hidden)
//!     ├─ generate_meta_summary (selection-ordered, fixed name)
//!     └─ show / hide / remove / toggle_selection
//!     ↓
//! Presentation (visible reports + analytics_core snapshots)
//! ```

pub mod naming;
pub mod report;
pub mod store;

pub use naming::{derive_summary_naming, longest_common_prefix, DEFAULT_SUMMARY_NAME, META_SUMMARY_NAME};
pub use report::{Report, ReportFlags, ReportId, ReportKind, SummarySource};
pub use store::ReportStore;
