use shiftsync_core::{EventDateTime, RemoteEvent};

use super::ToGoogle;
use crate::types::{GoogleEvent, GoogleEventDateTime};

impl ToGoogle<GoogleEvent> for RemoteEvent {
    /// Always written as `confirmed`, which also restores an event that was
    /// previously deleted (Google keeps those around as `cancelled`).
    fn to_google(&self) -> GoogleEvent {
        GoogleEvent {
            id: Some(self.id.clone()),
            status: Some("confirmed".to_string()),
            summary: self.summary.clone(),
            start: Some(self.start.to_google()),
            end: Some(self.end.to_google()),
        }
    }
}

impl ToGoogle<GoogleEventDateTime> for EventDateTime {
    fn to_google(&self) -> GoogleEventDateTime {
        GoogleEventDateTime {
            date_time: Some(self.date_time.clone()),
            date: None,
            time_zone: self.time_zone.clone(),
        }
    }
}
