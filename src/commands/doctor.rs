//! The `doctor` command: environment diagnostics.

use anyhow::{bail, Result};
use colored::Colorize;

use crate::settings::{self, Settings, OPTIONAL_VARS, REQUIRED_VARS};

/// Report which configuration variables are present, without ever
/// printing their values, then show the effective settings.
pub fn execute() -> Result<()> {
    println!("{}", "Checking configuration...".bold());

    for name in REQUIRED_VARS {
        if settings::read_var(name).is_some() {
            println!("  {} {name}", "✓".green());
        } else {
            println!("  {} {name} {}", "✗".red(), "(required, not set)".red());
        }
    }

    for name in OPTIONAL_VARS {
        if settings::read_var(name).is_some() {
            println!("  {} {name} {}", "✓".green(), "(override active)".dimmed());
        } else {
            println!(
                "  {} {name} {}",
                "·".dimmed(),
                "(optional, using default)".dimmed()
            );
        }
    }

    let missing = settings::missing_required_vars();
    if !missing.is_empty() {
        println!();
        bail!("missing required configuration: {}", missing.join(", "));
    }

    let settings = Settings::from_env()?;
    println!("\n{}", "Effective settings".bold());
    println!("  endpoint:      {}", settings.endpoint);
    println!("  poll interval: {}s", settings.poll_interval.as_secs());

    println!("\n{}", "Configuration complete.".green().bold());
    Ok(())
}
