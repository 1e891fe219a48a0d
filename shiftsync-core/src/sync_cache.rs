//! Record of which schedule content was last synced, per period.
//!
//! Stored at `<data dir>/shiftsync/sync-cache.json` as
//! `{"2024-06": {"etag": "...", "syncedOn": "..."}}`. The cache only answers
//! questions; deciding whether to skip a sync is up to the caller.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::SYNC_CACHE_TTL_HOURS;
use crate::error::{ShiftSyncError, ShiftSyncResult};
use crate::etag::Etag;

const SYNC_CACHE_FILE: &str = "sync-cache.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncCacheEntry {
    pub etag: Etag,
    pub synced_on: DateTime<Utc>,
}

impl SyncCacheEntry {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.synced_on > Duration::hours(SYNC_CACHE_TTL_HOURS)
    }
}

/// How a schedule compares with what was last synced for its period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// Never synced.
    Missing,
    /// Same content, but synced too long ago.
    Expired(SyncCacheEntry),
    /// Different content than last time.
    Changed(SyncCacheEntry),
    /// Same content, recently synced.
    Fresh(SyncCacheEntry),
}

impl CacheStatus {
    pub fn is_fresh(&self) -> bool {
        matches!(self, CacheStatus::Fresh(_))
    }
}

pub struct SyncCache {
    path: PathBuf,
    entries: BTreeMap<String, SyncCacheEntry>,
}

impl SyncCache {
    pub fn default_path() -> ShiftSyncResult<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ShiftSyncError::Config("Could not determine data directory".into()))?;
        Ok(data_dir.join("shiftsync").join(SYNC_CACHE_FILE))
    }

    /// Load the cache at `path`.
    ///
    /// A missing file is an empty cache. So is a corrupt one: the cache is
    /// only an optimization and the next successful sync rewrites it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed sync cache");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable sync cache");
                BTreeMap::new()
            }
        };

        SyncCache { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry(&self, period: &str) -> Option<&SyncCacheEntry> {
        self.entries.get(period)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &SyncCacheEntry)> {
        self.entries.iter().map(|(period, entry)| (period.as_str(), entry))
    }

    pub fn check(&self, period: &str, etag: &Etag) -> CacheStatus {
        self.check_at(period, etag, Utc::now())
    }

    pub fn check_at(&self, period: &str, etag: &Etag, now: DateTime<Utc>) -> CacheStatus {
        let Some(entry) = self.entry(period) else {
            return CacheStatus::Missing;
        };

        if &entry.etag != etag {
            CacheStatus::Changed(entry.clone())
        } else if entry.is_expired_at(now) {
            CacheStatus::Expired(entry.clone())
        } else {
            CacheStatus::Fresh(entry.clone())
        }
    }

    /// Record a successful sync of `etag` for `period`, replacing any earlier entry.
    pub fn add(&mut self, period: &str, etag: Etag) -> ShiftSyncResult<()> {
        self.add_at(period, etag, Utc::now())
    }

    pub fn add_at(&mut self, period: &str, etag: Etag, now: DateTime<Utc>) -> ShiftSyncResult<()> {
        self.entries.insert(
            period.to_string(),
            SyncCacheEntry {
                etag,
                synced_on: now,
            },
        );
        self.save()
    }

    /// Forget `period`. Returns whether there was anything to forget.
    pub fn remove(&mut self, period: &str) -> ShiftSyncResult<bool> {
        if self.entries.remove(period).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> ShiftSyncResult<()> {
        self.entries.clear();
        self.save()
    }

    fn save(&self) -> ShiftSyncResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        let temp = self.path.with_extension("json.tmp");

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path).map_err(|e| {
            ShiftSyncError::Cache(format!(
                "Failed to replace {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn etag(s: &str) -> Etag {
        Etag(s.to_string())
    }

    fn cache_in(dir: &tempfile::TempDir) -> SyncCache {
        SyncCache::load(dir.path().join("shiftsync").join(SYNC_CACHE_FILE))
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let recent = SyncCacheEntry {
            etag: etag("a"),
            synced_on: now - Duration::hours(23),
        };
        let stale = SyncCacheEntry {
            etag: etag("a"),
            synced_on: now - Duration::hours(25),
        };

        assert!(!recent.is_expired_at(now));
        assert!(stale.is_expired_at(now));
        assert!(stale.is_expired());
    }

    #[test]
    fn test_check_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = cache_in(&dir);
        let now = Utc::now();

        assert_eq!(cache.check_at("2024-06", &etag("a"), now), CacheStatus::Missing);

        cache.add_at("2024-06", etag("a"), now - Duration::hours(1)).unwrap();
        assert!(cache.check_at("2024-06", &etag("a"), now).is_fresh());
        assert!(matches!(
            cache.check_at("2024-06", &etag("b"), now),
            CacheStatus::Changed(entry) if entry.etag == etag("a")
        ));
        assert!(matches!(
            cache.check_at("2024-06", &etag("a"), now + Duration::hours(24)),
            CacheStatus::Expired(_)
        ));
    }

    #[test]
    fn test_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = cache_in(&dir);
        cache.add("2024-06", etag("a")).unwrap();
        cache.add("2024-06", etag("b")).unwrap();
        cache.add("2024-07", etag("c")).unwrap();

        let reloaded = cache_in(&dir);

        assert_eq!(reloaded.entry("2024-06").unwrap().etag, etag("b"));
        assert_eq!(reloaded.entries().count(), 2);
        assert!(!dir.path().join("shiftsync").join("sync-cache.json.tmp").exists());
    }

    #[test]
    fn test_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = cache_in(&dir);
        cache.add("2024-06", etag("abc")).unwrap();

        let raw = std::fs::read_to_string(cache.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(json["2024-06"]["etag"], "abc");
        assert!(json["2024-06"]["syncedOn"].is_string());
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SYNC_CACHE_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let mut cache = SyncCache::load(&path);
        assert_eq!(cache.entries().count(), 0);

        cache.add("2024-06", etag("a")).unwrap();
        assert_eq!(SyncCache::load(&path).entries().count(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = cache_in(&dir);
        cache.add("2024-06", etag("a")).unwrap();
        cache.add("2024-07", etag("b")).unwrap();

        assert!(cache.remove("2024-06").unwrap());
        assert!(!cache.remove("2024-06").unwrap());
        assert_eq!(cache_in(&dir).entries().count(), 1);

        cache.clear().unwrap();
        assert_eq!(cache_in(&dir).entries().count(), 0);
    }
}
