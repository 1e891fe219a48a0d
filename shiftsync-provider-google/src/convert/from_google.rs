use shiftsync_core::{EventDateTime, RemoteEvent, ShiftSyncError, ShiftSyncResult};

use super::FromGoogle;
use crate::types::{GoogleEvent, GoogleEventDateTime};

impl FromGoogle<GoogleEvent> for RemoteEvent {
    fn from_google(event: GoogleEvent) -> ShiftSyncResult<Self> {
        let id = event
            .id
            .ok_or_else(|| ShiftSyncError::InvalidRemoteEvent("Event has no id".into()))?;

        let start = event.start.ok_or_else(|| {
            ShiftSyncError::InvalidRemoteEvent(format!("Event '{id}' has no start time"))
        })?;
        let end = event.end.ok_or_else(|| {
            ShiftSyncError::InvalidRemoteEvent(format!("Event '{id}' has no end time"))
        })?;

        Ok(RemoteEvent {
            start: EventDateTime::from_google(start).map_err(|e| with_event_id(e, &id))?,
            end: EventDateTime::from_google(end).map_err(|e| with_event_id(e, &id))?,
            summary: event.summary,
            id,
        })
    }
}

impl FromGoogle<GoogleEventDateTime> for EventDateTime {
    /// All-day events keep their bare date. It never parses as an instant, so
    /// such an event is never equivalent to a shift.
    fn from_google(value: GoogleEventDateTime) -> ShiftSyncResult<Self> {
        let date_time = value
            .date_time
            .or(value.date)
            .ok_or_else(|| ShiftSyncError::InvalidRemoteEvent("Time has neither dateTime nor date".into()))?;

        Ok(EventDateTime {
            date_time,
            time_zone: value.time_zone,
        })
    }
}

fn with_event_id(error: ShiftSyncError, id: &str) -> ShiftSyncError {
    match error {
        ShiftSyncError::InvalidRemoteEvent(msg) => {
            ShiftSyncError::InvalidRemoteEvent(format!("Event '{id}': {msg}"))
        }
        other => other,
    }
}
