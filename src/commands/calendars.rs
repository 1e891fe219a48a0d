use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use shiftsync_core::config::ShiftSyncConfig;
use shiftsync_core::remote::CalendarClient;
use shiftsync_provider_google::GoogleCalendar;

use super::create_spinner;
use crate::render::Render;

pub async fn run(config: &ShiftSyncConfig) -> Result<()> {
    let client = GoogleCalendar::new(config.access_token()?)?;

    let spinner = create_spinner("Fetching calendars");
    let calendars = client.list_calendars().await;
    spinner.finish_and_clear();

    let calendars = calendars.context("Failed to list calendars")?;
    for calendar in &calendars {
        let selected = match config.calendar_id.as_deref() {
            Some("primary") => calendar.primary,
            Some(id) => calendar.id == id,
            None => false,
        };
        if selected {
            println!("{} {}", calendar.render(), "← syncing here".green());
        } else {
            println!("{}", calendar.render());
        }
    }

    if config.calendar_id.is_none() {
        println!();
        println!("Set calendar_id in config.toml to the calendar shifts should go to.");
        println!("{}", "Other timed events within a synced schedule's dates get deleted from it.".yellow());
    }

    Ok(())
}
