//! The report lineage manager
//!
//! Single-threaded, synchronous. Every operation reads the current report
//! vector, produces a replacement, and swaps it in wholesale, so observers
//! never see a partially-updated collection.

use super::naming::{derive_summary_naming, META_SUMMARY_NAME};
use super::report::{Report, ReportId, ReportKind, SummarySource};
use crate::analytics_core::TransactionRecord;

/// Owns the report collection, the active selection, and the set of
/// summaries marked for the next meta-summary.
#[derive(Debug, Default)]
pub struct ReportStore {
    reports: Vec<Report>,
    active: Option<ReportId>,
    /// Selection order is preserved: it is the record-concatenation order
    /// when a meta-summary is generated.
    selected_for_meta: Vec<ReportId>,
    next_id: u64,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ReportId {
        let id = ReportId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn get(&self, id: ReportId) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn active_id(&self) -> Option<ReportId> {
        self.active
    }

    pub fn active_report(&self) -> Option<&Report> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn selected_for_meta(&self) -> &[ReportId] {
        &self.selected_for_meta
    }

    /// Presentation view of the collection: hidden normal reports are
    /// omitted, summary-like reports are always listed.
    pub fn visible_reports(&self) -> impl Iterator<Item = &Report> {
        self.reports
            .iter()
            .filter(|r| !r.flags.is_hidden || r.is_summary_like())
    }

    /// Normal reports still available for the next summary.
    pub fn summary_eligible(&self) -> impl Iterator<Item = &Report> {
        self.reports
            .iter()
            .filter(|r| r.kind == ReportKind::Normal && !r.flags.is_used_in_summary)
    }

    /// Append one normal report per ingested file; the last one becomes
    /// active. Independent of every existing report.
    pub fn add_reports(&mut self, batch: impl IntoIterator<Item = (String, Vec<TransactionRecord>)>) {
        let mut next = std::mem::take(&mut self.reports);
        for (display_name, records) in batch {
            let id = self.allocate_id();
            log::info!("📄 Added report '{}' ({} records)", display_name, records.len());
            next.push(Report::new_normal(id, display_name, records));
            self.active = Some(id);
        }
        self.reports = next;
    }

    /// Combine every eligible normal report into a new summary report.
    ///
    /// No-op (returning `None`) with fewer than 2 eligible reports. Sources
    /// are flagged as consumed and hidden; the summary becomes active.
    pub fn generate_summary(&mut self) -> Option<ReportId> {
        let eligible: Vec<ReportId> = self.summary_eligible().map(|r| r.id).collect();
        if eligible.len() < 2 {
            log::debug!("Summary skipped: {} eligible report(s)", eligible.len());
            return None;
        }

        let names: Vec<&str> = eligible
            .iter()
            .filter_map(|id| self.get(*id))
            .map(|r| r.display_name.as_str())
            .collect();
        let (summary_name, labels) = derive_summary_naming(&names);

        let sources: Vec<SummarySource> = eligible
            .iter()
            .zip(labels)
            .map(|(report_id, label)| SummarySource { report_id: *report_id, label })
            .collect();

        let combined: Vec<TransactionRecord> = eligible
            .iter()
            .filter_map(|id| self.get(*id))
            .flat_map(|r| r.records.iter().cloned())
            .collect();

        let summary_id = self.allocate_id();
        let mut next: Vec<Report> = std::mem::take(&mut self.reports);
        for report in &mut next {
            if eligible.contains(&report.id) {
                report.flags.is_part_of_summary = true;
                report.flags.is_used_in_summary = true;
                report.flags.is_hidden = true;
            }
        }
        next.push(Report {
            id: summary_id,
            display_name: summary_name.clone(),
            kind: ReportKind::Summary,
            records: combined,
            sources,
            flags: Default::default(),
        });

        self.reports = next;
        self.active = Some(summary_id);
        log::info!("🧮 Generated summary '{}' from {} reports", summary_name, eligible.len());
        Some(summary_id)
    }

    /// Combine the selected summaries into a meta-summary.
    ///
    /// Only selected `Summary` reports not yet consumed by a meta-summary
    /// qualify; fewer than 2 is a no-op. Records concatenate in selection
    /// order. Afterwards only the selected summaries and the new meta-summary
    /// remain in the collection — everything else is dropped. That retention
    /// policy mirrors the observed product behavior and is flagged for
    /// clarification rather than fixed here.
    pub fn generate_meta_summary(&mut self) -> Option<ReportId> {
        let selected: Vec<ReportId> = self
            .selected_for_meta
            .iter()
            .copied()
            .filter(|id| {
                self.get(*id).is_some_and(|r| {
                    r.kind == ReportKind::Summary && !r.flags.is_used_in_meta_summary
                })
            })
            .collect();
        if selected.len() < 2 {
            log::debug!("Meta-summary skipped: {} selected summary(ies)", selected.len());
            return None;
        }

        let combined: Vec<TransactionRecord> = selected
            .iter()
            .filter_map(|id| self.get(*id))
            .flat_map(|r| r.records.iter().cloned())
            .collect();
        let sources: Vec<SummarySource> = selected
            .iter()
            .filter_map(|id| self.get(*id))
            .map(|r| SummarySource { report_id: r.id, label: r.display_name.clone() })
            .collect();

        let dropped: Vec<&str> = self
            .reports
            .iter()
            .filter(|r| !selected.contains(&r.id))
            .map(|r| r.display_name.as_str())
            .collect();
        if !dropped.is_empty() {
            log::warn!(
                "⚠️  Meta-summary drops {} unselected report(s) from the collection: {}",
                dropped.len(),
                dropped.join(", ")
            );
        }

        let meta_id = self.allocate_id();
        let mut next: Vec<Report> = std::mem::take(&mut self.reports)
            .into_iter()
            .filter(|r| selected.contains(&r.id))
            .map(|mut r| {
                r.flags.is_used_in_meta_summary = true;
                r
            })
            .collect();
        next.push(Report {
            id: meta_id,
            display_name: META_SUMMARY_NAME.to_string(),
            kind: ReportKind::MetaSummary,
            records: combined,
            sources,
            flags: Default::default(),
        });

        self.reports = next;
        self.active = Some(meta_id);
        self.selected_for_meta.clear();
        log::info!("🧮 Generated meta-summary from {} summaries", selected.len());
        Some(meta_id)
    }

    /// Unhide a report and make it active. Never changes kind or usage flags.
    pub fn show(&mut self, id: ReportId) -> bool {
        let Some(report) = self.reports.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        report.flags.is_hidden = false;
        self.active = Some(id);
        true
    }

    /// Hide a report. The active selection falls back to the first
    /// summary-like report, else the first report in the collection.
    pub fn hide(&mut self, id: ReportId) -> bool {
        let Some(report) = self.reports.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        report.flags.is_hidden = true;

        let fallback = self
            .reports
            .iter()
            .find(|r| r.is_summary_like())
            .or_else(|| self.reports.first())
            .map(|r| r.id);
        self.active = fallback;
        true
    }

    /// Delete a normal report that is not part of any summary.
    ///
    /// Summary members cannot be removed directly (hide them instead). When
    /// the removed report was active, the report at the same position in the
    /// shortened collection (clamped) becomes active.
    pub fn remove(&mut self, id: ReportId) -> bool {
        let Some(position) = self.reports.iter().position(|r| r.id == id) else {
            return false;
        };
        let report = &self.reports[position];
        if report.kind != ReportKind::Normal || report.flags.is_part_of_summary {
            log::warn!(
                "Refusing to remove '{}': part of a summary or not a normal report",
                report.display_name
            );
            return false;
        }

        let was_active = self.active == Some(id);
        let mut next = std::mem::take(&mut self.reports);
        next.remove(position);
        self.reports = next;
        self.selected_for_meta.retain(|selected| *selected != id);

        if was_active {
            self.active = if self.reports.is_empty() {
                None
            } else {
                let index = position.min(self.reports.len() - 1);
                Some(self.reports[index].id)
            };
        }
        true
    }

    /// Toggle a summary's membership in the next meta-summary. Meaningful
    /// only for `Summary` reports not yet consumed by a meta-summary.
    pub fn toggle_selection(&mut self, id: ReportId) -> bool {
        let qualifies = self.get(id).is_some_and(|r| {
            r.kind == ReportKind::Summary && !r.flags.is_used_in_meta_summary
        });
        if !qualifies {
            return false;
        }
        if let Some(index) = self.selected_for_meta.iter().position(|s| *s == id) {
            self.selected_for_meta.remove(index);
        } else {
            self.selected_for_meta.push(id);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected_for_meta.clear();
    }
}
