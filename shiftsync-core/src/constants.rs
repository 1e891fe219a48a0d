//! Fixed values shared across shiftsync.

/// Timezone the UKG schedule is published in.
pub const DEFAULT_SCHEDULE_TIMEZONE: &str = "America/Toronto";

/// Summary written on every calendar event created from a schedule.
pub const SHIFT_SUMMARY: &str = "Shift";

/// Cache entries older than this are considered expired.
pub const SYNC_CACHE_TTL_HOURS: i64 = 24;
