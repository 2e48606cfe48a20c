// Inspection Reporter - Core Library
// Classifies vehicle-inspection chat messages and renders weekly summaries.
// Exposes all modules for use in the daemon binary and tests.

pub mod config;    // Environment configuration
pub mod directory; // Pattern Library - company directory + aliases
pub mod extract;   // Field Extractors - category, transfer state, unit codes
pub mod record;    // Record Builder - raw messages → inspection records
pub mod report;    // Report Renderer - counts → summary text
pub mod runner;    // One full report run + weekly schedule
pub mod stats;     // Aggregator - grouped counts + diagnostics
pub mod telegram;  // Message source / report sink collaborator

// Re-export commonly used types
pub use config::Config;
pub use directory::{match_key, normalize_text, CompanyDirectory, MatchEntry};
pub use extract::{
    extract_category, extract_transfer_state, extract_unit_codes, TransferState, UNKNOWN,
};
pub use record::{build_records, InspectionRecord, RawMessage, DEFAULT_LOOKBACK_DAYS};
pub use report::render;
pub use runner::{next_weekly_run, run_report};
pub use stats::{unknown_companies, unknown_transfers, ReportStats};
pub use telegram::TelegramClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
