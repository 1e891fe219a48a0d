use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use shiftsync_core::config::ShiftSyncConfig;
use shiftsync_core::sync_cache::SyncCache;
use shiftsync_core::Etag;

use super::{load_schedule, resolve_period};
use crate::render::Render;

pub fn run(config: &ShiftSyncConfig, schedule_path: &Path, period: Option<String>) -> Result<()> {
    let schedule = load_schedule(schedule_path)?;
    let etag = Etag::of(&schedule)?;
    let period = resolve_period(&schedule, period)?;

    let cache = SyncCache::load(config.cache_path()?);
    let status = cache.check(&period, &etag);

    println!("🗓  {}", period.bold());
    println!(
        "   {} {} ({} to {})",
        schedule.events.len(),
        if schedule.events.len() == 1 { "shift" } else { "shifts" },
        schedule.bounds.start,
        schedule.bounds.end
    );
    println!("   etag {}", etag.short().dimmed());
    println!("   {}", status.render());

    Ok(())
}
