use anyhow::Result;
use clap::{Parser, Subcommand};
use vigil::commands::{check, doctor, run};
use vigil::logging;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Watches a review queue and reports status changes to Telegram", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the watch loop
    Run {
        /// Seconds between poll cycles (overrides VIGIL_POLL_SECS)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },

    /// Probe the review API once without sending anything
    Check {
        /// How far back to look, in seconds
        #[arg(long, default_value_t = 86_400, value_parser = clap::value_parser!(u64).range(1..))]
        window: u64,
    },

    /// Verify the environment configuration
    Doctor,
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { interval } => run::execute(interval),
        Commands::Check { window } => check::execute(window),
        Commands::Doctor => doctor::execute(),
    }
}
