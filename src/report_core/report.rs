//! Report entities: named record collections with lineage metadata

use crate::analytics_core::TransactionRecord;
use serde::Serialize;

/// Stable, opaque report identifier assigned at creation.
///
/// Lineage references use ids exclusively; a report's position in the
/// collection is a display concern and changes as reports come and go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ReportId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportKind {
    /// One ingested file.
    Normal,
    /// Combination of ≥2 normal reports.
    Summary,
    /// Combination of ≥2 summaries. Terminal: never combined further.
    MetaSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportFlags {
    pub is_hidden: bool,
    pub is_part_of_summary: bool,
    pub is_used_in_summary: bool,
    pub is_used_in_meta_summary: bool,
}

/// One combined report's source entry.
///
/// The label is derived once at creation (the source name minus the common
/// prefix) and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummarySource {
    pub report_id: ReportId,
    pub label: String,
}

/// A named, ordered record set plus lineage metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub id: ReportId,
    pub display_name: String,
    pub kind: ReportKind,
    #[serde(skip)]
    pub records: Vec<TransactionRecord>,
    /// Present only for summaries and meta-summaries.
    pub sources: Vec<SummarySource>,
    pub flags: ReportFlags,
}

impl Report {
    pub(crate) fn new_normal(id: ReportId, display_name: String, records: Vec<TransactionRecord>) -> Self {
        Self {
            id,
            display_name,
            kind: ReportKind::Normal,
            records,
            sources: Vec::new(),
            flags: ReportFlags::default(),
        }
    }

    /// Summaries stay listed even when hidden; only normal reports disappear.
    pub fn is_summary_like(&self) -> bool {
        matches!(self.kind, ReportKind::Summary | ReportKind::MetaSummary)
    }

    /// Sources with a non-empty label, for the clickable source list. Sources
    /// whose label stripped down to nothing stay in `sources` but are omitted
    /// here.
    pub fn labeled_sources(&self) -> impl Iterator<Item = &SummarySource> {
        self.sources.iter().filter(|s| !s.label.is_empty())
    }
}
