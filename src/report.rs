// 🧮 Report Formatter - merge statistics for display
// Pure aggregation over counters the merge engine already produced.

use crate::stats::StatsSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const RULE: &str = "-------------------------------------------";

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Run-level counts that are not per-owner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Size of the deduplicated output
    pub unique_saved: usize,
    pub duplicates_removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberReport {
    pub owner_id: String,
    pub existing: u64,
    pub fetched: u64,
    pub duplicates_in_fetch: u64,
    pub unique_merged: u64,
    pub final_total_saved: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub member_count: usize,
    pub existing: u64,
    pub fetched: u64,
    pub unique_merged: u64,
    pub unique_saved: usize,
    pub duplicates_removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    pub members: Vec<MemberReport>,
    pub totals: ReportTotals,
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Build the structured report. Members come out ordered by owner id.
pub fn format(stats: &StatsSnapshot, run: RunTotals) -> MergeReport {
    let members: Vec<MemberReport> = stats
        .iter()
        .map(|(owner_id, entry)| MemberReport {
            owner_id: owner_id.clone(),
            existing: entry.existing,
            fetched: entry.fetched,
            duplicates_in_fetch: entry.duplicates_in_fetch(),
            unique_merged: entry.unique_merged,
            final_total_saved: entry.final_total_saved(),
        })
        .collect();

    let totals = ReportTotals {
        member_count: members.len(),
        existing: members.iter().map(|m| m.existing).sum(),
        fetched: members.iter().map(|m| m.fetched).sum(),
        unique_merged: members.iter().map(|m| m.unique_merged).sum(),
        unique_saved: run.unique_saved,
        duplicates_removed: run.duplicates_removed,
    };

    MergeReport { members, totals }
}

impl MergeReport {
    pub fn summary(&self) -> String {
        format!(
            "{} members: {} existing + {} fetched, {} new merged, {} unique saved ({} removed)",
            self.totals.member_count,
            self.totals.existing,
            self.totals.fetched,
            self.totals.unique_merged,
            self.totals.unique_saved,
            self.totals.duplicates_removed
        )
    }

    /// Multi-line text block: one section per member, then totals
    pub fn render(&self) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(out, "--- 📊 MERGE AND DOWNLOAD STATISTICS ---");
        for member in &self.members {
            let _ = writeln!(out, "\n{RULE}");
            let _ = writeln!(out, "👤 Member {}:", member.owner_id);
            let _ = writeln!(out, "  - Existing Receipts (from file)   :  {}", member.existing);
            let _ = writeln!(out, "  - Receipts Fetched  (via API)     :  {}", member.fetched);
            let _ = writeln!(out, "  - Duplicates Found  (in API Fetch):  {}", member.duplicates_in_fetch);
            let _ = writeln!(out, "  - New   Unique Receipts to Merge  :  {}", member.unique_merged);
            let _ = writeln!(out, "  - Total Unique Receipts Saved     :  {}", member.final_total_saved);
        }

        let totals = &self.totals;
        let _ = writeln!(out, "\n{RULE}");
        let _ = writeln!(out, "🧾 TOTALS");
        let _ = writeln!(out, "  - Members                         :  {}", totals.member_count);
        let _ = writeln!(out, "  - Existing Receipts (from file)   :  {}", totals.existing);
        let _ = writeln!(out, "  - Receipts Fetched (from API)     :  {}", totals.fetched);
        let _ = writeln!(out, "  - New Receipts Merged             :  {}", totals.unique_merged);
        let _ = writeln!(out, "  - Duplicates Removed              :  {}", totals.duplicates_removed);
        let _ = writeln!(out, "  - Unique Receipts Saved           :  {}", totals.unique_saved);
        let _ = write!(out, "{RULE}");

        out
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsEntry;

    fn snapshot() -> StatsSnapshot {
        let mut stats = StatsSnapshot::new();
        stats.insert("M2".to_string(), StatsEntry { existing: 4, fetched: 3, unique_merged: 1 });
        stats.insert("M1".to_string(), StatsEntry { existing: 10, fetched: 6, unique_merged: 2 });
        stats
    }

    #[test]
    fn test_member_derivations() {
        let report = format(&snapshot(), RunTotals { unique_saved: 17, duplicates_removed: 6 });

        let m1 = &report.members[0];
        assert_eq!(m1.owner_id, "M1");
        assert_eq!(m1.duplicates_in_fetch, 4);
        assert_eq!(m1.final_total_saved, 12);

        let m2 = &report.members[1];
        assert_eq!(m2.owner_id, "M2");
        assert_eq!(m2.duplicates_in_fetch, 2);
        assert_eq!(m2.final_total_saved, 5);
    }

    #[test]
    fn test_totals() {
        let report = format(&snapshot(), RunTotals { unique_saved: 17, duplicates_removed: 6 });

        assert_eq!(
            report.totals,
            ReportTotals {
                member_count: 2,
                existing: 14,
                fetched: 9,
                unique_merged: 3,
                unique_saved: 17,
                duplicates_removed: 6,
            }
        );
    }

    #[test]
    fn test_empty_stats() {
        let report = format(&StatsSnapshot::new(), RunTotals::default());

        assert!(report.members.is_empty());
        assert_eq!(report.totals, ReportTotals::default());
    }

    #[test]
    fn test_render_lists_every_member() {
        let report = format(&snapshot(), RunTotals { unique_saved: 17, duplicates_removed: 6 });
        let text = report.render();

        assert!(text.contains("Member M1:"));
        assert!(text.contains("Member M2:"));
        assert!(text.contains("Unique Receipts Saved           :  17"));
        assert!(text.find("Member M1").unwrap() < text.find("TOTALS").unwrap());
    }

    #[test]
    fn test_summary() {
        let report = format(&snapshot(), RunTotals { unique_saved: 17, duplicates_removed: 6 });

        assert_eq!(
            report.summary(),
            "2 members: 14 existing + 9 fetched, 3 new merged, 17 unique saved (6 removed)"
        );
    }
}
