//! Runtime configuration read from the environment.
//!
//! All credentials and overrides come from `VIGIL_*` variables; there is
//! no config file. `Settings::from_env` is the single read point, and a
//! variable that is set but blank counts as missing.

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::api::DEFAULT_ENDPOINT;

/// Token for the review status API (sent as `Authorization: OAuth <token>`).
pub const API_TOKEN_VAR: &str = "VIGIL_API_TOKEN";
/// Telegram bot token used to deliver notifications.
pub const BOT_TOKEN_VAR: &str = "VIGIL_BOT_TOKEN";
/// Telegram chat that receives the notifications.
pub const CHAT_ID_VAR: &str = "VIGIL_CHAT_ID";
/// Optional override for the review status endpoint URL.
pub const ENDPOINT_VAR: &str = "VIGIL_ENDPOINT";
/// Optional override for the poll interval, in seconds.
pub const POLL_SECS_VAR: &str = "VIGIL_POLL_SECS";

/// Seconds between poll cycles unless overridden.
pub const DEFAULT_POLL_SECS: u64 = 600;

/// Variables the watcher refuses to start without.
pub const REQUIRED_VARS: [&str; 3] = [API_TOKEN_VAR, BOT_TOKEN_VAR, CHAT_ID_VAR];
/// Variables with built-in defaults.
pub const OPTIONAL_VARS: [&str; 2] = [ENDPOINT_VAR, POLL_SECS_VAR];

/// Raised when required environment variables are absent. Fatal: the
/// watch loop must never start with partial credentials.
#[derive(Debug, Error)]
#[error("missing required environment variables: {}", .names.join(", "))]
pub struct MissingConfig {
    pub names: Vec<&'static str>,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_token: String,
    pub bot_token: String,
    pub chat_id: String,
    pub endpoint: String,
    pub poll_interval: Duration,
}

impl Settings {
    /// Read and validate configuration from the environment.
    ///
    /// # Returns
    /// `Err(MissingConfig)` naming every absent required variable.
    /// Optional variables fall back to their defaults; an unparseable
    /// poll interval is ignored with a warning rather than treated as
    /// fatal.
    pub fn from_env() -> Result<Self, MissingConfig> {
        let api_token = read_var(API_TOKEN_VAR);
        let bot_token = read_var(BOT_TOKEN_VAR);
        let chat_id = read_var(CHAT_ID_VAR);

        if let (Some(api_token), Some(bot_token), Some(chat_id)) =
            (api_token, bot_token, chat_id)
        {
            Ok(Self {
                api_token,
                bot_token,
                chat_id,
                endpoint: read_var(ENDPOINT_VAR)
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                poll_interval: Duration::from_secs(poll_secs_from_env()),
            })
        } else {
            Err(MissingConfig {
                names: missing_required_vars(),
            })
        }
    }
}

/// Return every required variable that is unset or blank.
/// An empty result means the configuration is complete.
pub fn missing_required_vars() -> Vec<&'static str> {
    REQUIRED_VARS
        .iter()
        .copied()
        .filter(|name| read_var(name).is_none())
        .collect()
}

/// Read a variable, treating whitespace-only values as absent.
pub(crate) fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn poll_secs_from_env() -> u64 {
    match read_var(POLL_SECS_VAR) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!("ignoring invalid {POLL_SECS_VAR}={raw:?}, using {DEFAULT_POLL_SECS}s");
                DEFAULT_POLL_SECS
            }
        },
        None => DEFAULT_POLL_SECS,
    }
}
