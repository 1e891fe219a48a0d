//! The schedule extracted from the UKG page.

use std::collections::HashSet;

use chrono::{Datelike, Duration};
use serde::{Deserialize, Serialize};

use crate::error::{ShiftSyncError, ShiftSyncResult};
use crate::naive_time::{CivilTime, NaiveDate, NaiveDatetime};

/// One shift on the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    /// Looks like `event-transfershift-4745823`.
    pub id: String,
    pub start: NaiveDatetime,
    pub end: NaiveDatetime,
    /// Millisecond timestamp, only used for ordering.
    pub sort_key: i64,
}

/// Inclusive range of dates visible on the schedule page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// An extracted schedule.
///
/// `events` are always ordered by `sort_key`. The etag relies on it.
/// Field order here is the canonical serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub events: Vec<ScheduleEvent>,
    pub bounds: Bounds,
}

impl Schedule {
    pub fn from_json(json: &str) -> ShiftSyncResult<Self> {
        let schedule: Schedule = serde_json::from_str(json)
            .map_err(|e| ShiftSyncError::InvalidSchedule(format!("Failed to parse schedule: {e}")))?;
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check the invariants producers are expected to uphold.
    pub fn validate(&self) -> ShiftSyncResult<()> {
        let start = self.bounds.start.to_chrono()?;
        let end = self.bounds.end.to_chrono()?;
        if start >= end {
            return Err(ShiftSyncError::InvalidSchedule(format!(
                "Bounds must cover at least two days (got {} to {})",
                self.bounds.start, self.bounds.end
            )));
        }

        if let Some(pair) = self.events.windows(2).find(|w| w[0].sort_key > w[1].sort_key) {
            return Err(ShiftSyncError::InvalidSchedule(format!(
                "Events are not sorted: '{}' comes before '{}'",
                pair[0].id, pair[1].id
            )));
        }

        let mut seen = HashSet::new();
        for event in &self.events {
            if !seen.insert(event.id.as_str()) {
                return Err(ShiftSyncError::InvalidSchedule(format!(
                    "Duplicate event id '{}'",
                    event.id
                )));
            }

            if event.end.to_naive_datetime()? <= event.start.to_naive_datetime()? {
                return Err(ShiftSyncError::InvalidSchedule(format!(
                    "Event '{}' ends before it starts ({} to {})",
                    event.id, event.start, event.end
                )));
            }
        }

        Ok(())
    }

    /// The month this schedule is about, as `YYYY-MM`.
    ///
    /// Schedule pages show a few days of the neighbouring months, so the
    /// middle of the bounds is used rather than either end.
    pub fn period(&self) -> ShiftSyncResult<String> {
        let start = self.bounds.start.to_chrono()?;
        let end = self.bounds.end.to_chrono()?;
        let mid = start + Duration::days((end - start).num_days() / 2);
        Ok(format!("{:04}-{:02}", mid.year(), mid.month()))
    }
}
