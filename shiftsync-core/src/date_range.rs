//! Time window for listing remote events.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::ShiftSyncResult;
use crate::naive_time::CivilTime;
use crate::schedule::Bounds;

/// Half-open range `[from, to)` of event start times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// The window covered by a schedule's bounds.
    ///
    /// `to` is midnight after the last day, so shifts on the final day are
    /// still included.
    pub fn from_bounds(bounds: &Bounds, zone: Tz) -> ShiftSyncResult<Self> {
        Ok(DateRange {
            from: bounds.start.to_instant(zone)?,
            to: bounds.end.next_day().to_instant(zone)?,
        })
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.from <= instant && instant < self.to
    }
}
