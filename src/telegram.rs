// 📨 Telegram Collaborator - message source and report sink
// Thin Bot API client: fetch inspection messages, deliver the summary.
//
// Both operations retry with doubling backoff (up to 5 attempts) and a 30 s
// per-request timeout. Failures here abort the current report run; the
// classification stage itself is deterministic and is never retried.

use anyhow::{anyhow, Context, Result};
use chrono::DateTime;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::record::RawMessage;

const API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_ATTEMPTS: u32 = 5;
const INITIAL_BACKOFF_MS: u64 = 500;
const UPDATES_PAGE_SIZE: u32 = 100;

/// Telegram Bot API client
pub struct TelegramClient {
    http: Client,
    base_url: String,
}

impl TelegramClient {
    /// Create a new client for the given bot token
    pub fn new(bot_token: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(TelegramClient {
            http,
            base_url: format!("{}/bot{}", API_BASE, bot_token),
        })
    }

    /// Fetch up to `limit` text messages from the given chat (and topic, if
    /// set). Order is as delivered by the API; the record builder filters by
    /// timestamp and does not require any particular order.
    pub async fn fetch_messages(
        &self,
        chat_id: i64,
        topic_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<RawMessage>> {
        let mut messages = Vec::new();
        let mut offset: Option<i64> = None;

        loop {
            let updates = self.get_updates(offset).await?;
            if updates.is_empty() {
                break;
            }

            for update in &updates {
                offset = Some(update.update_id + 1);

                let Some(msg) = &update.message else { continue };
                if msg.chat.id != chat_id {
                    continue;
                }
                if let Some(topic) = topic_id {
                    if msg.message_thread_id != Some(topic) {
                        continue;
                    }
                }
                let Some(text) = &msg.text else { continue };

                let timestamp = DateTime::from_timestamp(msg.date, 0)
                    .with_context(|| format!("Invalid message timestamp {}", msg.date))?;
                messages.push(RawMessage {
                    timestamp,
                    text: text.clone(),
                });
            }

            if messages.len() >= limit {
                messages.truncate(limit);
                break;
            }
        }

        Ok(messages)
    }

    /// Deliver the rendered report to the output chat, with retries
    pub async fn send_report(&self, chat_id: i64, text: &str) -> Result<()> {
        let mut delay = Duration::from_millis(INITIAL_BACKOFF_MS);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.send_message_once(chat_id, text).await {
                Ok(()) => return Ok(()),
                Err(err) if attempt >= MAX_ATTEMPTS => {
                    return Err(err)
                        .with_context(|| format!("sendMessage failed after {} attempts", attempt));
                }
                Err(err) => {
                    tracing::warn!(
                        "sendMessage attempt {}/{} failed: {:#}",
                        attempt,
                        MAX_ATTEMPTS,
                        err
                    );
                    sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    /// One page of updates, with retries
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let mut delay = Duration::from_millis(INITIAL_BACKOFF_MS);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.get_updates_once(offset).await {
                Ok(updates) => return Ok(updates),
                Err(err) if attempt >= MAX_ATTEMPTS => {
                    return Err(err)
                        .with_context(|| format!("getUpdates failed after {} attempts", attempt));
                }
                Err(err) => {
                    tracing::warn!(
                        "getUpdates attempt {}/{} failed: {:#}",
                        attempt,
                        MAX_ATTEMPTS,
                        err
                    );
                    sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    async fn send_message_once(&self, chat_id: i64, text: &str) -> Result<()> {
        let url = format!("{}/sendMessage", self.base_url);
        let response: ApiResponse<serde_json::Value> = self
            .http
            .post(&url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            .context("sendMessage request failed")?
            .json()
            .await
            .context("Failed to parse sendMessage response")?;

        response.into_result().map(|_| ())
    }

    async fn get_updates_once(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let url = format!("{}/getUpdates", self.base_url);
        let mut request = self.http.get(&url).query(&[("limit", UPDATES_PAGE_SIZE)]);
        if let Some(offset) = offset {
            request = request.query(&[("offset", offset)]);
        }

        let response: ApiResponse<Vec<Update>> = request
            .send()
            .await
            .context("getUpdates request failed")?
            .json()
            .await
            .context("Failed to parse getUpdates response")?;

        response.into_result()
    }
}

// ============================================================================
// BOT API PAYLOADS
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T> {
        if !self.ok {
            return Err(anyhow!(
                "Telegram API error: {}",
                self.description.unwrap_or_else(|| "unknown".to_string())
            ));
        }
        self.result
            .ok_or_else(|| anyhow!("Telegram API response missing result"))
    }
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    date: i64,
    chat: Chat,
    text: Option<String>,
    message_thread_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}
