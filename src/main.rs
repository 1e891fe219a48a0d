mod commands;
mod lock;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shiftsync_core::config::ShiftSyncConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shiftsync")]
#[command(about = "Mirror your UKG work schedule into Google Calendar")]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the calendar with a schedule
    Sync {
        /// Schedule JSON extracted from the UKG schedule page
        #[arg(short, long)]
        schedule: PathBuf,

        /// Calendar to write to (overrides calendar_id from config)
        #[arg(short, long)]
        calendar: Option<String>,

        /// Cache key (defaults to the month in the middle of the schedule, e.g. "2024-06")
        #[arg(long)]
        period: Option<String>,

        /// Sync even if the schedule is unchanged or auto_sync is off
        #[arg(long)]
        force: bool,
    },
    /// Show whether a schedule needs syncing
    Status {
        #[arg(short, long)]
        schedule: PathBuf,

        #[arg(long)]
        period: Option<String>,
    },
    /// List the calendars the access token can see
    Calendars,
    /// Inspect or reset the sync cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    Show,
    Clear {
        /// Only forget this period
        #[arg(long)]
        period: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ShiftSyncConfig::load()?;

    match cli.command {
        Commands::Sync {
            schedule,
            calendar,
            period,
            force,
        } => {
            let options = commands::sync::SyncOptions {
                schedule,
                calendar,
                period,
                force,
            };
            commands::sync::run(&config, options).await
        }
        Commands::Status { schedule, period } => commands::status::run(&config, &schedule, period),
        Commands::Calendars => commands::calendars::run(&config).await,
        Commands::Cache { command } => match command {
            CacheCommands::Show => commands::cache::show(&config),
            CacheCommands::Clear { period } => commands::cache::clear(&config, period.as_deref()),
        },
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
