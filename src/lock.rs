//! One `shiftsync sync` per calendar across processes.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

/// Releases the lock when dropped.
pub struct LockGuard {
    _file: File,
}

fn lock_dir() -> Result<PathBuf> {
    let runtime_dir = dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine runtime directory"))?;

    Ok(runtime_dir.join("shiftsync"))
}

/// Calendar ids are email-like; keep the file name portable.
fn lock_file_name(calendar_id: &str) -> String {
    let name: String = calendar_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("sync-{name}.lock")
}

pub fn acquire(calendar_id: &str) -> Result<LockGuard> {
    acquire_in(&lock_dir()?, calendar_id)
}

/// Take the lock for `calendar_id`, failing if another process holds it.
pub fn acquire_in(dir: &Path, calendar_id: &str) -> Result<LockGuard> {
    fs::create_dir_all(dir)?;
    let path = dir.join(lock_file_name(calendar_id));
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another shiftsync sync is already running for calendar '{}'.\n\
            If you believe this is an error, remove: {}",
            calendar_id,
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_is_exclusive_per_calendar() {
        let dir = tempfile::tempdir().unwrap();

        let guard = acquire_in(dir.path(), "primary").unwrap();
        assert!(acquire_in(dir.path(), "primary").is_err());
        assert!(acquire_in(dir.path(), "work@group.calendar.google.com").is_ok());

        drop(guard);
        assert!(acquire_in(dir.path(), "primary").is_ok());
    }

    #[test]
    fn test_lock_file_name_is_portable() {
        assert_eq!(
            lock_file_name("me@example.com/x"),
            "sync-me_example.com_x.lock"
        );
    }
}
