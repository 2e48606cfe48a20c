// 📊 Report Stats - Aggregator
// Folds a record list into three grouped counts plus diagnostics.
//
// Counts are always derived fresh from a complete record list, never
// updated incrementally. Keys are not pre-seeded: a value with zero
// occurrences is simply absent.

use indexmap::IndexMap;

use crate::extract::{TransferState, UNKNOWN};
use crate::record::InspectionRecord;

/// Grouped counts over one report run.
///
/// The maps are insertion-ordered: the order of keys is the order in which
/// each value was first seen in the record list. The renderer relies on
/// this as its deterministic tie-break for equal counts.
#[derive(Debug, Clone, Default)]
pub struct ReportStats {
    pub total: usize,
    pub by_category: IndexMap<String, usize>,
    pub by_company: IndexMap<String, usize>,
    pub by_transfer_state: IndexMap<String, usize>,
}

impl ReportStats {
    /// Fold a complete record list into grouped counts
    pub fn from_records(records: &[InspectionRecord]) -> Self {
        let mut stats = ReportStats {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            *stats.by_category.entry(record.category.clone()).or_insert(0) += 1;
            *stats.by_company.entry(record.company.clone()).or_insert(0) += 1;
            *stats
                .by_transfer_state
                .entry(record.transfer_state.as_str().to_string())
                .or_insert(0) += 1;
        }

        stats
    }
}

/// Records whose company could not be matched, in original order.
/// Logged for operators so the directory or aliases can be extended.
pub fn unknown_companies(records: &[InspectionRecord]) -> Vec<&InspectionRecord> {
    records.iter().filter(|r| r.company == UNKNOWN).collect()
}

/// Records with no recognizable transfer phrase, in original order
pub fn unknown_transfers(records: &[InspectionRecord]) -> Vec<&InspectionRecord> {
    records
        .iter()
        .filter(|r| r.transfer_state == TransferState::Unknown)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(category: &str, company: &str, state: TransferState) -> InspectionRecord {
        InspectionRecord {
            timestamp: Utc::now(),
            category: category.to_string(),
            company: company.to_string(),
            transfer_state: state,
            unit_codes: String::new(),
            snippet: format!("#{}", category.to_lowercase()),
        }
    }

    #[test]
    fn test_category_counts_sum_to_total() {
        let records = vec![
            record("Clean", "A", TransferState::Transferred),
            record("Clean", "B", TransferState::Transferred),
            record("HOS", "A", TransferState::Unknown),
            record("Violation", "Unknown", TransferState::NotTransferred),
            record("Clean", "C", TransferState::Transferred),
        ];

        let stats = ReportStats::from_records(&records);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_category.values().sum::<usize>(), 5);
        assert_eq!(stats.by_category["Clean"], 3);
        assert_eq!(stats.by_category["HOS"], 1);
        assert_eq!(stats.by_category["Violation"], 1);
    }

    #[test]
    fn test_absent_keys_are_not_seeded() {
        let records = vec![record("Clean", "A", TransferState::Transferred)];
        let stats = ReportStats::from_records(&records);
        assert!(!stats.by_category.contains_key("HOS"));
        assert!(!stats.by_transfer_state.contains_key("Not Transferred"));
    }

    #[test]
    fn test_keys_kept_in_first_seen_order() {
        let records = vec![
            record("HOS", "B", TransferState::Unknown),
            record("Clean", "A", TransferState::Transferred),
            record("HOS", "A", TransferState::Transferred),
        ];
        let stats = ReportStats::from_records(&records);
        let categories: Vec<&String> = stats.by_category.keys().collect();
        assert_eq!(categories, vec!["HOS", "Clean"]);
        let companies: Vec<&String> = stats.by_company.keys().collect();
        assert_eq!(companies, vec!["B", "A"]);
    }

    #[test]
    fn test_transfer_state_uses_display_names() {
        let records = vec![
            record("Clean", "A", TransferState::NotTransferred),
            record("Clean", "A", TransferState::Transferred),
        ];
        let stats = ReportStats::from_records(&records);
        assert_eq!(stats.by_transfer_state["Not Transferred"], 1);
        assert_eq!(stats.by_transfer_state["Transferred"], 1);
    }

    #[test]
    fn test_unknown_diagnostics_preserve_order() {
        let records = vec![
            record("Clean", "Unknown", TransferState::Transferred),
            record("HOS", "A", TransferState::Unknown),
            record("Clean", "Unknown", TransferState::Unknown),
        ];

        let companies = unknown_companies(&records);
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].category, "Clean");

        let transfers = unknown_transfers(&records);
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].category, "HOS");
    }

    #[test]
    fn test_empty_record_list() {
        let stats = ReportStats::from_records(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_category.is_empty());
        assert!(stats.by_company.is_empty());
        assert!(stats.by_transfer_state.is_empty());
    }
}
