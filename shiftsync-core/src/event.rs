//! Calendar events as the remote calendar sees them.
//!
//! Schedule events are converted into [`RemoteEvent`]s before they are
//! compared with what the calendar already holds, so both sides of the diff
//! go through the same shape.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::SHIFT_SUMMARY;
use crate::error::{ShiftSyncError, ShiftSyncResult};
use crate::naive_time::CivilTime;
use crate::schedule::ScheduleEvent;

/// A calendar event (remote shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    pub id: String,
    pub summary: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// RFC 3339, as sent or received.
    pub date_time: String,
    /// Ignored when comparing events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Derive the remote event id for a schedule event id.
///
/// Remote ids can't contain punctuation, so everything but lowercase ASCII
/// letters and digits is dropped.
pub fn remote_id(local_id: &str) -> String {
    local_id
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

impl EventDateTime {
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        EventDateTime {
            date_time: instant.to_rfc3339_opts(SecondsFormat::Millis, true),
            time_zone: None,
        }
    }

    pub fn instant(&self) -> ShiftSyncResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.date_time)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                ShiftSyncError::InvalidRemoteEvent(format!(
                    "Invalid dateTime '{}': {e}",
                    self.date_time
                ))
            })
    }

    /// Same instant, whatever offset each side was written with.
    fn same_instant(&self, other: &EventDateTime) -> bool {
        match (self.instant(), other.instant()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl RemoteEvent {
    /// The calendar event a schedule event should become.
    pub fn from_schedule(event: &ScheduleEvent, zone: Tz) -> ShiftSyncResult<Self> {
        Ok(RemoteEvent {
            id: remote_id(&event.id),
            summary: Some(SHIFT_SUMMARY.to_string()),
            start: EventDateTime::from_instant(event.start.to_instant(zone)?),
            end: EventDateTime::from_instant(event.end.to_instant(zone)?),
        })
    }

    /// Whether `self` already represents `required` on the calendar.
    ///
    /// `timeZone` is not compared: the remote always answers with its own
    /// offset annotation.
    pub fn is_equivalent(&self, required: &RemoteEvent) -> bool {
        self.summary == required.summary
            && self.start.same_instant(&required.start)
            && self.end.same_instant(&required.end)
    }
}

impl fmt::Display for RemoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} - {}",
            self.summary.as_deref().unwrap_or("(No title)"),
            self.id,
            self.start.date_time,
            self.end.date_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::tests::shift;

    fn event(start: &str, end: &str) -> RemoteEvent {
        RemoteEvent {
            id: "eventshift1".to_string(),
            summary: Some("Shift".to_string()),
            start: EventDateTime {
                date_time: start.to_string(),
                time_zone: None,
            },
            end: EventDateTime {
                date_time: end.to_string(),
                time_zone: None,
            },
        }
    }

    #[test]
    fn test_remote_id_strips_punctuation() {
        assert_eq!(remote_id("event-transfershift-4745823"), "eventtransfershift4745823");
    }

    #[test]
    fn test_remote_id_lowercases() {
        assert_eq!(remote_id("Event_Shift.42"), "eventshift42");
        assert_eq!(remote_id("ÉVENT-1"), "vent1");
    }

    #[test]
    fn test_equivalent_across_offsets() {
        let required = event("2024-06-15T17:00:00.000Z", "2024-06-16T00:30:00.000Z");
        let mut existing = event("2024-06-15T13:00:00-04:00", "2024-06-15T20:30:00-04:00");
        existing.start.time_zone = Some("America/Toronto".to_string());

        assert!(existing.is_equivalent(&required));
    }

    #[test]
    fn test_not_equivalent_when_times_differ() {
        let required = event("2024-06-15T17:00:00.000Z", "2024-06-16T00:30:00.000Z");
        let existing = event("2024-06-15T13:00:00-04:00", "2024-06-15T20:00:00-04:00");

        assert!(!existing.is_equivalent(&required));
    }

    #[test]
    fn test_not_equivalent_when_summary_differs() {
        let required = event("2024-06-15T17:00:00Z", "2024-06-16T00:30:00Z");
        let mut existing = required.clone();
        existing.summary = None;

        assert!(!existing.is_equivalent(&required));
    }

    #[test]
    fn test_unparseable_time_is_never_equivalent() {
        let required = event("2024-06-15T17:00:00Z", "2024-06-16T00:30:00Z");
        let existing = event("yesterday", "2024-06-16T00:30:00Z");

        assert!(!existing.is_equivalent(&required));
    }

    #[test]
    fn test_from_schedule() {
        let shift = shift("event-transfershift-4745823", 15, (12, 30), (20, 0));
        let event = RemoteEvent::from_schedule(&shift, chrono_tz::America::Toronto).unwrap();

        assert_eq!(event.id, "eventtransfershift4745823");
        assert_eq!(event.summary.as_deref(), Some("Shift"));
        assert_eq!(event.start.date_time, "2024-06-15T16:30:00.000Z");
        assert_eq!(event.end.date_time, "2024-06-16T00:00:00.000Z");
    }
}
