use anyhow::Result;
use owo_colors::OwoColorize;
use shiftsync_core::config::ShiftSyncConfig;
use shiftsync_core::sync_cache::SyncCache;

use crate::render::Render;

pub fn show(config: &ShiftSyncConfig) -> Result<()> {
    let cache = SyncCache::load(config.cache_path()?);

    println!("{}", cache.path().display().dimmed());
    let mut empty = true;
    for (period, entry) in cache.entries() {
        println!("   {} {}", period.bold(), entry.render());
        empty = false;
    }
    if empty {
        println!("   {}", "(empty)".dimmed());
    }

    Ok(())
}

pub fn clear(config: &ShiftSyncConfig, period: Option<&str>) -> Result<()> {
    let mut cache = SyncCache::load(config.cache_path()?);

    match period {
        Some(period) => {
            if cache.remove(period)? {
                println!("Forgot {period}");
            } else {
                println!("{}", format!("Nothing cached for {period}").dimmed());
            }
        }
        None => {
            cache.clear()?;
            println!("Cleared sync cache");
        }
    }

    Ok(())
}
