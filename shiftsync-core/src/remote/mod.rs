//! The remote calendar, as seen by the reconciliation engine.
//!
//! [`CalendarClient`] is the seam between the engine and a concrete calendar
//! API. Clients are handed in already authenticated; nothing in this crate
//! touches credentials.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::ShiftSyncResult;
use crate::event::RemoteEvent;

/// Outcome of an insert. A duplicate id is an answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    Inserted,
    AlreadyExists,
}

/// Outcome of an update. A missing event is an answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    Updated,
    NotFound,
}

/// A calendar the authenticated account can write to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub summary: String,
    pub primary: bool,
}

#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn list_calendars(&self) -> ShiftSyncResult<Vec<CalendarInfo>>;

    /// Events whose start falls within `range`.
    async fn list_events(
        &self,
        calendar_id: &str,
        range: &DateRange,
    ) -> ShiftSyncResult<Vec<RemoteEvent>>;

    async fn insert_event(&self, calendar_id: &str, event: &RemoteEvent) -> ShiftSyncResult<Insert>;

    async fn update_event(&self, calendar_id: &str, event: &RemoteEvent) -> ShiftSyncResult<Update>;

    /// Returns `false` if the event was already gone.
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ShiftSyncResult<bool>;
}

/// A client bound to one target calendar.
pub struct Remote<'a> {
    client: &'a dyn CalendarClient,
    calendar_id: &'a str,
}

impl<'a> Remote<'a> {
    pub fn new(client: &'a dyn CalendarClient, calendar_id: &'a str) -> Self {
        Remote {
            client,
            calendar_id,
        }
    }

    pub fn calendar_id(&self) -> &str {
        self.calendar_id
    }

    pub async fn events(&self, range: &DateRange) -> ShiftSyncResult<Vec<RemoteEvent>> {
        self.client.list_events(self.calendar_id, range).await
    }

    pub async fn insert_event(&self, event: &RemoteEvent) -> ShiftSyncResult<Insert> {
        self.client.insert_event(self.calendar_id, event).await
    }

    pub async fn update_event(&self, event: &RemoteEvent) -> ShiftSyncResult<Update> {
        self.client.update_event(self.calendar_id, event).await
    }

    pub async fn delete_event(&self, event_id: &str) -> ShiftSyncResult<bool> {
        self.client.delete_event(self.calendar_id, event_id).await
    }
}
