// ⚙️ Configuration - loaded once from the environment at startup
// Missing or malformed required variables are fatal: the daemon must not
// accept any trigger without credentials and chat identifiers.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::record::DEFAULT_LOOKBACK_DAYS;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FETCH_LIMIT: usize = 500;

/// Daemon configuration, immutable after startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,
    /// Chat the inspection reports are posted in
    pub source_chat: i64,
    /// Optional forum topic (message thread) inside the source chat
    pub source_topic: Option<i64>,
    /// Chat the rendered summary is delivered to
    pub output_chat: i64,
    /// Health endpoint port
    pub port: u16,
    /// Lookback window in days
    pub lookback_days: i64,
    /// Maximum number of messages fetched per run
    pub fetch_limit: usize,
    /// Optional JSON file overriding the built-in company directory
    pub companies_file: Option<PathBuf>,
}

impl Config {
    /// Read configuration from process environment (after `dotenv`)
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            bot_token: required("TELEGRAM_BOT_TOKEN")?,
            source_chat: required_parsed("SOURCE_CHAT_ID")?,
            source_topic: optional_parsed("SOURCE_TOPIC_ID")?,
            output_chat: required_parsed("OUTPUT_CHAT_ID")?,
            port: optional_parsed("PORT")?.unwrap_or(DEFAULT_PORT),
            lookback_days: optional_parsed("LOOKBACK_DAYS")?.unwrap_or(DEFAULT_LOOKBACK_DAYS),
            fetch_limit: optional_parsed("FETCH_LIMIT")?.unwrap_or(DEFAULT_FETCH_LIMIT),
            companies_file: env::var("COMPANIES_FILE").ok().map(PathBuf::from),
        })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("Missing required environment variable {}", name))
}

fn required_parsed<T>(name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    required(name)?
        .parse()
        .with_context(|| format!("Invalid value for environment variable {}", name))
}

fn optional_parsed<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => {
            let parsed = value
                .parse()
                .with_context(|| format!("Invalid value for environment variable {}", name))?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}

// ============================================================================
// TESTS
// ============================================================================
