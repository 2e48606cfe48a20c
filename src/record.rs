// 📋 Inspection Records - Record Builder
// Turns raw chat messages into structured inspection records.
//
// A record is built once and never mutated; it lives only for the duration
// of a single report run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::CompanyDirectory;
use crate::extract::{
    extract_category, extract_transfer_state, extract_unit_codes, TransferState,
};

/// Default lookback window for a report run
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Maximum snippet length kept on a record, in characters
pub const SNIPPET_CHARS: usize = 200;

/// Raw message as delivered by the message source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMessage {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// One classified inspection report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub company: String,
    pub transfer_state: TransferState,
    pub unit_codes: String,
    /// First 200 chars of the trimmed message, for diagnostics
    pub snippet: String,
}

/// Build one record per qualifying message, preserving input order.
///
/// A message qualifies when its body is non-empty after trimming, its
/// timestamp is inside `now - window`, and the trimmed text starts with `#`.
/// Every surviving record therefore satisfies `timestamp >= now - window`
/// and `snippet.starts_with('#')`.
pub fn build_records(
    messages: &[RawMessage],
    directory: &CompanyDirectory,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<InspectionRecord> {
    let cutoff = now - window;
    let mut records = Vec::new();

    for message in messages {
        let text = message.text.trim();
        if text.is_empty() {
            continue;
        }
        if message.timestamp < cutoff {
            continue;
        }
        if !text.starts_with('#') {
            continue;
        }

        records.push(InspectionRecord {
            timestamp: message.timestamp,
            category: extract_category(text),
            company: directory.match_company(text),
            transfer_state: extract_transfer_state(text),
            unit_codes: extract_unit_codes(text),
            snippet: text.chars().take(SNIPPET_CHARS).collect(),
        });
    }

    records
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn test_directory() -> CompanyDirectory {
        CompanyDirectory::new(&["ABC Trucking LLC"], &IndexMap::new())
    }

    fn msg(timestamp: DateTime<Utc>, text: &str) -> RawMessage {
        RawMessage {
            timestamp,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_non_hashtag_messages_excluded() {
        let now = Utc::now();
        let messages = vec![
            msg(now, "clean inspection, logs transferred"),
            msg(now, "ABC Trucking unit D"),
        ];
        let records = build_records(&messages, &test_directory(), now, Duration::days(7));
        assert!(records.is_empty());
    }

    #[test]
    fn test_blank_messages_excluded() {
        let now = Utc::now();
        let messages = vec![msg(now, ""), msg(now, "   \n  ")];
        let records = build_records(&messages, &test_directory(), now, Duration::days(7));
        assert!(records.is_empty());
    }

    #[test]
    fn test_messages_outside_window_excluded() {
        let now = Utc::now();
        let messages = vec![
            msg(now - Duration::days(8), "#clean ABC Trucking, transferred"),
            msg(now - Duration::days(3), "#clean ABC Trucking, transferred"),
        ];
        let records = build_records(&messages, &test_directory(), now, Duration::days(7));
        assert_eq!(records.len(), 1);
        assert!(records[0].timestamp >= now - Duration::days(7));
    }

    #[test]
    fn test_leading_whitespace_is_trimmed_before_hashtag_check() {
        let now = Utc::now();
        let messages = vec![msg(now, "  #clean ABC Trucking  ")];
        let records = build_records(&messages, &test_directory(), now, Duration::days(7));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category, "Clean");
        assert!(records[0].snippet.starts_with('#'));
    }

    #[test]
    fn test_full_record_classification() {
        let now = Utc::now();
        let messages = vec![msg(now, "#Clean ABC Trucking LLC unit-1, not transferred")];
        let records = build_records(&messages, &test_directory(), now, Duration::days(7));

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.category, "Clean");
        assert_eq!(record.company, "ABC Trucking LLC");
        assert_eq!(record.transfer_state, TransferState::NotTransferred);
        assert_eq!(record.unit_codes, "1");
    }

    #[test]
    fn test_output_preserves_input_order() {
        let now = Utc::now();
        let messages = vec![
            msg(now - Duration::hours(1), "#hos second"),
            msg(now - Duration::hours(2), "#clean first"),
        ];
        let records = build_records(&messages, &test_directory(), now, Duration::days(7));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, "HOS");
        assert_eq!(records[1].category, "Clean");
    }

    #[test]
    fn test_snippet_truncated_to_200_chars() {
        let now = Utc::now();
        let long = format!("#clean {}", "x".repeat(300));
        let messages = vec![msg(now, &long)];
        let records = build_records(&messages, &test_directory(), now, Duration::days(7));
        assert_eq!(records[0].snippet.chars().count(), SNIPPET_CHARS);
    }

    #[test]
    fn test_snippet_truncation_respects_multibyte_chars() {
        let now = Utc::now();
        // Cyrillic text: two bytes per letter, so position 200 in chars is
        // nowhere near a byte boundary
        let long = format!("#clean {}", "ы".repeat(300));
        let messages = vec![msg(now, &long)];
        let records = build_records(&messages, &test_directory(), now, Duration::days(7));

        let snippet = &records[0].snippet;
        assert_eq!(snippet.chars().count(), SNIPPET_CHARS);
        assert!(snippet.ends_with('ы'));
        assert!(long.starts_with(snippet.as_str()));
    }
}
