//! User configuration.
//!
//! Read from `~/.config/shiftsync/config.toml` (optional), then overridden by
//! `SHIFTSYNC_*` environment variables, e.g. `SHIFTSYNC_ACCESS_TOKEN`.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::DEFAULT_SCHEDULE_TIMEZONE;
use crate::error::{ShiftSyncError, ShiftSyncResult};
use crate::sync_cache::SyncCache;

fn default_timezone() -> String {
    DEFAULT_SCHEDULE_TIMEZONE.to_string()
}

fn default_auto_sync() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShiftSyncConfig {
    /// Target Google calendar. Never defaulted: every event in the schedule
    /// window that isn't a shift gets deleted from it.
    pub calendar_id: Option<String>,

    /// OAuth bearer token for the Calendar API.
    pub access_token: Option<String>,

    /// IANA zone the schedule's wall-clock times are in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// When false, `sync` only reports that a sync is needed.
    #[serde(default = "default_auto_sync")]
    pub auto_sync: bool,

    /// Where the sync cache lives. `~` is expanded.
    pub cache_path: Option<PathBuf>,
}

impl ShiftSyncConfig {
    pub fn config_path() -> ShiftSyncResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ShiftSyncError::Config("Could not determine config directory".into()))?
            .join("shiftsync");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> ShiftSyncResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> ShiftSyncResult<Self> {
        let config: ShiftSyncConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("SHIFTSYNC"))
            .build()
            .map_err(|e| ShiftSyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ShiftSyncError::Config(e.to_string()))?;

        Ok(config)
    }

    pub fn zone(&self) -> ShiftSyncResult<Tz> {
        self.timezone
            .parse()
            .map_err(|e| ShiftSyncError::Config(format!("Invalid timezone '{}': {e}", self.timezone)))
    }

    pub fn cache_path(&self) -> ShiftSyncResult<PathBuf> {
        match &self.cache_path {
            Some(path) => Ok(PathBuf::from(
                shellexpand::tilde(&path.to_string_lossy()).into_owned(),
            )),
            None => SyncCache::default_path(),
        }
    }

    /// The calendar to sync into: `requested` if given, else the configured one.
    pub fn target_calendar(&self, requested: Option<String>) -> ShiftSyncResult<String> {
        requested.or_else(|| self.calendar_id.clone()).ok_or_else(|| {
            ShiftSyncError::Config(
                "No target calendar. Run `shiftsync calendars` to pick one, then set calendar_id \
                 in config.toml or pass --calendar"
                    .into(),
            )
        })
    }

    pub fn access_token(&self) -> ShiftSyncResult<&str> {
        self.access_token.as_deref().ok_or_else(|| {
            ShiftSyncError::Config(
                "No access token configured. Set access_token in config.toml or SHIFTSYNC_ACCESS_TOKEN"
                    .into(),
            )
        })
    }
}
