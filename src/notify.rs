//! Delivery of notifications to a Telegram chat.
//!
//! The watch loop only observes success or failure here; delivery
//! failures are logged by the loop and never retried.

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::api::create_http_client;

/// Base URL for the Telegram Bot API.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// The channel notifications go out through.
pub trait Messenger {
    /// Deliver one message to one chat.
    fn deliver(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Telegram Bot API `sendMessage` client.
pub struct TelegramMessenger {
    client: Client,
    bot_token: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SendReply {
    ok: bool,
    description: Option<String>,
}

impl TelegramMessenger {
    pub fn new(bot_token: &str) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            bot_token: bot_token.to_string(),
        })
    }
}

impl Messenger for TelegramMessenger {
    fn deliver(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{TELEGRAM_API_BASE}/bot{}/sendMessage", self.bot_token);
        let response = self
            .client
            .post(&url)
            .json(&SendMessage { chat_id, text })
            .send()
            .context("Failed to reach the Telegram API")?;

        let status = response.status();
        let reply: SendReply = response
            .json()
            .context("Failed to decode the Telegram API reply")?;

        // Telegram reports failures in the body with `ok: false`; the
        // HTTP status alone is not enough to tell.
        if !status.is_success() || !reply.ok {
            let detail = reply
                .description
                .unwrap_or_else(|| format!("HTTP {status}"));
            bail!("Telegram rejected the message: {detail}");
        }

        Ok(())
    }
}
