// 🔁 Report Runner - one full report run, fetch → classify → render → send
// Runs are serialized by the caller; the pipeline itself is synchronous and
// deterministic, so nothing in here retries.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use uuid::Uuid;

use crate::config::Config;
use crate::directory::CompanyDirectory;
use crate::record::build_records;
use crate::report::render;
use crate::stats::{unknown_companies, unknown_transfers, ReportStats};
use crate::telegram::TelegramClient;

/// Weekly trigger: Monday 14:00 UTC (8 pm Bishkek)
pub const REPORT_WEEKDAY: Weekday = Weekday::Mon;
pub const REPORT_HOUR_UTC: u32 = 14;

/// Execute one report run. No partial reports: sending only happens after
/// the full record list, all three aggregates and the rendering are done.
pub async fn run_report(
    config: &Config,
    directory: &CompanyDirectory,
    client: &TelegramClient,
) -> Result<()> {
    let run_id = Uuid::new_v4();
    let now = Utc::now();
    let window = Duration::days(config.lookback_days);
    let window_start = now - window;

    tracing::info!(%run_id, "Starting report run ({} - {})", window_start, now);

    let messages = client
        .fetch_messages(config.source_chat, config.source_topic, config.fetch_limit)
        .await
        .context("Failed to fetch messages")?;
    tracing::info!(%run_id, "Fetched {} messages", messages.len());

    let records = build_records(&messages, directory, now, window);
    tracing::info!(
        %run_id,
        "Found {} inspections in the last {} days",
        records.len(),
        config.lookback_days
    );

    for (idx, record) in unknown_companies(&records).iter().enumerate() {
        tracing::warn!(
            %run_id,
            "Unknown company #{}: date={} text={}",
            idx + 1,
            record.timestamp,
            record.snippet
        );
    }
    for (idx, record) in unknown_transfers(&records).iter().enumerate() {
        tracing::warn!(
            %run_id,
            "Unknown transfer state #{}: date={} text={}",
            idx + 1,
            record.timestamp,
            record.snippet
        );
    }

    let stats = ReportStats::from_records(&records);
    let report = render(&stats, window_start, now);
    tracing::debug!(%run_id, "Rendered report:\n{}", report);

    client
        .send_report(config.output_chat, &report)
        .await
        .context("Failed to send report")?;

    tracing::info!(%run_id, "Report run complete");
    Ok(())
}

/// Next weekly trigger instant strictly after `after`
pub fn next_weekly_run(after: DateTime<Utc>) -> DateTime<Utc> {
    let days_ahead = (REPORT_WEEKDAY.num_days_from_monday() + 7
        - after.weekday().num_days_from_monday())
        % 7;
    let date = after.date_naive() + Duration::days(days_ahead as i64);
    let naive = date
        .and_hms_opt(REPORT_HOUR_UTC, 0, 0)
        .expect("valid wall-clock time");
    let candidate = Utc.from_utc_datetime(&naive);

    if candidate <= after {
        candidate + Duration::days(7)
    } else {
        candidate
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(y, m, d)
                .expect("valid date")
                .and_hms_opt(h, min, 0)
                .expect("valid time"),
        )
    }

    #[test]
    fn test_next_run_later_in_week() {
        // Wednesday → following Monday
        let next = next_weekly_run(utc(2024, 6, 5, 10, 0));
        assert_eq!(next, utc(2024, 6, 10, 14, 0));
    }

    #[test]
    fn test_next_run_same_monday_before_trigger() {
        let next = next_weekly_run(utc(2024, 6, 10, 9, 0));
        assert_eq!(next, utc(2024, 6, 10, 14, 0));
    }

    #[test]
    fn test_next_run_same_monday_after_trigger() {
        let next = next_weekly_run(utc(2024, 6, 10, 15, 0));
        assert_eq!(next, utc(2024, 6, 17, 14, 0));
    }

    #[test]
    fn test_next_run_exactly_at_trigger_moves_a_week() {
        // Trigger instant itself is not "strictly after"
        let next = next_weekly_run(utc(2024, 6, 10, 14, 0));
        assert_eq!(next, utc(2024, 6, 17, 14, 0));
    }

    #[test]
    fn test_next_run_is_always_monday_1400() {
        let mut t = utc(2024, 1, 1, 0, 0);
        for _ in 0..30 {
            let next = next_weekly_run(t);
            assert_eq!(next.weekday(), Weekday::Mon);
            assert_eq!(next.hour(), REPORT_HOUR_UTC);
            assert!(next > t);
            t = t + Duration::hours(23);
        }
    }
}
