pub mod cache;
pub mod calendars;
pub mod status;
pub mod sync;

use std::path::Path;

use anyhow::{Context, Result};
use shiftsync_core::Schedule;

pub use crate::utils::tui::create_spinner;

/// Read and validate a schedule JSON file.
pub fn load_schedule(path: &Path) -> Result<Schedule> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule {}", path.display()))?;
    Schedule::from_json(&json).with_context(|| format!("Invalid schedule {}", path.display()))
}

/// The period a schedule is cached under, unless overridden.
pub fn resolve_period(schedule: &Schedule, period: Option<String>) -> Result<String> {
    match period {
        Some(period) => Ok(period),
        None => Ok(schedule.period()?),
    }
}
