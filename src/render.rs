//! TUI rendering traits for shiftsync types.
//!
//! Extension traits that add colored terminal output to shiftsync-core
//! types using owo_colors.

use owo_colors::OwoColorize;
use shiftsync_core::remote::CalendarInfo;
use shiftsync_core::sync::SyncResult;
use shiftsync_core::sync_cache::{CacheStatus, SyncCacheEntry};

pub trait Render {
    fn render(&self) -> String;
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

impl Render for SyncResult {
    fn render(&self) -> String {
        if self.is_empty() {
            return "Calendar already matches the schedule".dimmed().to_string();
        }

        let mut parts = Vec::new();
        if self.created > 0 {
            parts.push(format!("+{} created", self.created).green().to_string());
        }
        if self.updated > 0 {
            parts.push(format!("~{} updated", self.updated).yellow().to_string());
        }
        if self.deleted > 0 {
            parts.push(format!("-{} deleted", self.deleted).red().to_string());
        }

        let total = self.created + self.updated + self.deleted;
        format!("{} ({} {})", parts.join(", "), total, pluralize("change", total))
    }
}

impl Render for SyncCacheEntry {
    fn render(&self) -> String {
        let synced = self
            .synced_on
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M");
        let mut line = format!("{} synced {}", self.etag.short(), synced);
        if self.is_expired() {
            line = format!("{} {}", line, "(expired)".yellow());
        }
        line
    }
}

impl Render for CacheStatus {
    fn render(&self) -> String {
        match self {
            CacheStatus::Missing => "never synced".yellow().to_string(),
            CacheStatus::Expired(entry) => format!(
                "{} since {}",
                "unchanged but stale".yellow(),
                entry.synced_on.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
            ),
            CacheStatus::Changed(entry) => format!(
                "{} (was {})",
                "schedule changed".yellow(),
                entry.etag.short().dimmed()
            ),
            CacheStatus::Fresh(_) => "up to date".green().to_string(),
        }
    }
}

impl Render for CalendarInfo {
    fn render(&self) -> String {
        let marker = if self.primary {
            format!(" {}", "(primary)".dimmed())
        } else {
            String::new()
        };
        format!("📅 {} {}{}", self.summary, self.id.dimmed(), marker)
    }
}
