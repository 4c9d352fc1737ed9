//! The `check` command: a one-shot probe of the review pipeline.

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;

use crate::api::{ReviewApi, StatusSource};
use crate::envelope;
use crate::settings::Settings;
use crate::verdict;

/// Fetch one window, validate it, and print what a cycle would report.
/// Nothing is delivered to the chat.
pub fn execute(window_secs: u64) -> Result<()> {
    let settings = Settings::from_env()?;
    let api = ReviewApi::new(&settings.endpoint, &settings.api_token)
        .context("Failed to set up the review API client")?;

    println!("{}", "Probing the review API...".bold());

    let cursor = Utc::now().timestamp() - window_secs as i64;
    let payload = api.fetch_since(cursor)?;
    println!("  {} endpoint reachable: {}", "✓".green(), settings.endpoint);

    let envelope = envelope::validate(&payload)?;
    println!(
        "  {} envelope valid: {} item(s), cursor {}",
        "✓".green(),
        envelope.homeworks.len(),
        envelope.current_date
    );

    match envelope.homeworks.first() {
        Some(item) => {
            let message = verdict::interpret(item)?;
            println!("  {} latest verdict: {message}", "✓".green());
        }
        None => {
            println!(
                "  {} no review activity in the last {window_secs}s",
                "·".dimmed()
            );
        }
    }

    println!("\n{}", "Pipeline healthy.".green().bold());
    Ok(())
}
