// 📝 Report Renderer - aggregate counts → summary text
// Fixed-structure weekly summary sent to the output chat.

use chrono::{DateTime, Utc};

use crate::stats::ReportStats;

/// Sort map entries by count descending. `sort_by` is stable, so entries
/// with equal counts keep the map's insertion order (first seen first);
/// that is the documented tie-break.
fn sorted_entries(map: &indexmap::IndexMap<String, usize>) -> Vec<(&String, usize)> {
    let mut entries: Vec<(&String, usize)> = map.iter().map(|(k, v)| (k, *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

fn section(map: &indexmap::IndexMap<String, usize>) -> String {
    sorted_entries(map)
        .iter()
        .map(|(key, count)| format!("  {}: {}", key, count))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Render the weekly summary.
///
/// Sections list "  <key>: <count>" lines sorted by count descending; the
/// company header carries the number of distinct companies seen.
pub fn render(stats: &ReportStats, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> String {
    format!(
        "📊 WEEKLY INSPECTION REPORT\n\
         📅 {} - {}\n\
         \n\
         📈 Total Inspections: {}\n\
         \n\
         📋 By Category:\n{}\n\
         \n\
         🏢 Companies ({}):\n{}\n\
         \n\
         📤 Transfer Status:\n{}",
        window_start.format("%Y-%m-%d"),
        window_end.format("%Y-%m-%d"),
        stats.total,
        section(&stats.by_category),
        stats.by_company.len(),
        section(&stats.by_company),
        section(&stats.by_transfer_state),
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::TransferState;
    use crate::record::InspectionRecord;
    use chrono::Duration;

    fn record(category: &str, company: &str, state: TransferState) -> InspectionRecord {
        InspectionRecord {
            timestamp: Utc::now(),
            category: category.to_string(),
            company: company.to_string(),
            transfer_state: state,
            unit_codes: String::new(),
            snippet: String::new(),
        }
    }

    #[test]
    fn test_sections_sorted_by_count_descending() {
        let records = vec![
            record("A", "X", TransferState::Transferred),
            record("A", "X", TransferState::Transferred),
            record("B", "Y", TransferState::Transferred),
        ];
        let stats = ReportStats::from_records(&records);
        let now = Utc::now();
        let report = render(&stats, now - Duration::days(7), now);

        let a_pos = report.find("  A: 2").expect("category A line present");
        let b_pos = report.find("  B: 1").expect("category B line present");
        assert!(a_pos < b_pos);
    }

    #[test]
    fn test_equal_counts_keep_first_seen_order() {
        let records = vec![
            record("HOS", "X", TransferState::Transferred),
            record("Clean", "Y", TransferState::Transferred),
        ];
        let stats = ReportStats::from_records(&records);
        let now = Utc::now();
        let report = render(&stats, now - Duration::days(7), now);

        let hos_pos = report.find("  HOS: 1").expect("HOS line present");
        let clean_pos = report.find("  Clean: 1").expect("Clean line present");
        assert!(hos_pos < clean_pos);
    }

    #[test]
    fn test_header_totals_and_company_count() {
        let records = vec![
            record("Clean", "X", TransferState::Transferred),
            record("Clean", "Y", TransferState::NotTransferred),
            record("HOS", "X", TransferState::Unknown),
        ];
        let stats = ReportStats::from_records(&records);
        let now = Utc::now();
        let report = render(&stats, now - Duration::days(7), now);

        assert!(report.contains("📈 Total Inspections: 3"));
        assert!(report.contains("🏢 Companies (2):"));
        assert!(report.contains("  Not Transferred: 1"));
    }

    #[test]
    fn test_date_range_in_header() {
        let stats = ReportStats::from_records(&[]);
        let end = Utc::now();
        let start = end - Duration::days(7);
        let report = render(&stats, start, end);

        assert!(report.contains(&format!(
            "📅 {} - {}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )));
    }
}
