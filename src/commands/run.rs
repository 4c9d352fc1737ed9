//! The `run` command: start the watch loop.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::{error, info};

use crate::api::ReviewApi;
use crate::notify::TelegramMessenger;
use crate::settings::Settings;
use crate::watcher::Watcher;

/// Validate configuration, then poll until the process is terminated.
///
/// # Arguments
/// * `interval_override` - Seconds between cycles from the CLI flag;
///   takes precedence over the environment override and the default.
pub fn execute(interval_override: Option<u64>) -> Result<()> {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            error!("{err}");
            bail!("configuration incomplete, refusing to start");
        }
    };

    let poll_interval = match interval_override {
        Some(secs) => Duration::from_secs(secs),
        None => settings.poll_interval,
    };

    let api = ReviewApi::new(&settings.endpoint, &settings.api_token)
        .context("Failed to set up the review API client")?;
    let messenger = TelegramMessenger::new(&settings.bot_token)
        .context("Failed to set up the Telegram client")?;

    // Only changes observed from now on are reported; history before
    // startup stays silent.
    let start_cursor = Utc::now().timestamp();
    info!(
        "polling {} (cursor starts at {start_cursor})",
        settings.endpoint
    );

    let mut watcher = Watcher::new(api, messenger, &settings.chat_id, start_cursor);
    watcher.run(poll_interval)
}
