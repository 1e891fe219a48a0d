use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use shiftsync_core::config::ShiftSyncConfig;
use shiftsync_core::sync::Reconciler;
use shiftsync_core::sync_cache::SyncCache;
use shiftsync_core::Etag;
use shiftsync_provider_google::GoogleCalendar;
use tracing::info;

use super::{create_spinner, load_schedule, resolve_period};
use crate::lock;
use crate::render::Render;

pub struct SyncOptions {
    pub schedule: PathBuf,
    pub calendar: Option<String>,
    pub period: Option<String>,
    pub force: bool,
}

pub async fn run(config: &ShiftSyncConfig, options: SyncOptions) -> Result<()> {
    let calendar_id = config.target_calendar(options.calendar)?;

    let schedule = load_schedule(&options.schedule)?;
    let etag = Etag::of(&schedule)?;
    let period = resolve_period(&schedule, options.period)?;

    let mut cache = SyncCache::load(config.cache_path()?);
    let status = cache.check(&period, &etag);
    println!("🗓  {} {}", period.bold(), status.render());

    if status.is_fresh() && !options.force {
        println!("{}", "Nothing to do (use --force to sync anyway)".dimmed());
        return Ok(());
    }

    if !config.auto_sync && !options.force {
        println!(
            "{}",
            "Sync needed. auto_sync is off, run again with --force to sync.".yellow()
        );
        return Ok(());
    }

    let client = GoogleCalendar::new(config.access_token()?)?;
    let reconciler = Reconciler::new(client, config.zone()?);

    let _lock = lock::acquire(&calendar_id)?;

    let spinner = create_spinner(format!("Syncing {} events to {}", schedule.events.len(), calendar_id));
    let result = reconciler.sync(&calendar_id, &schedule).await;
    spinner.finish_and_clear();

    let result = result.with_context(|| format!("Failed to sync calendar '{calendar_id}'"))?;
    println!("   {}", result.render());

    cache
        .add(&period, etag)
        .context("Synced, but failed to update the sync cache")?;
    info!(%period, %calendar_id, "sync recorded");

    Ok(())
}
