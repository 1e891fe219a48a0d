//! In-memory calendar used by the engine's tests.
//!
//! Deleted ids are remembered the way Google keeps cancelled events around:
//! inserting one again is a conflict, updating it brings it back.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::date_range::DateRange;
use crate::error::{ShiftSyncError, ShiftSyncResult};
use crate::event::{EventDateTime, RemoteEvent};
use crate::remote::{CalendarClient, CalendarInfo, Insert, Update};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Insert(String),
    Update(String),
    Delete(String),
}

#[derive(Default)]
struct State {
    events: BTreeMap<String, RemoteEvent>,
    deleted: HashSet<String>,
    calls: Vec<Call>,
    forced_insert: Option<Insert>,
    fail_on_update: bool,
    vanish_after_list: Option<String>,
    list_by_overlap: bool,
}

#[derive(Default)]
pub struct MemoryCalendar {
    state: Mutex<State>,
}

pub fn remote_event(id: &str, start: &str, end: &str) -> RemoteEvent {
    RemoteEvent {
        id: id.to_string(),
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

impl MemoryCalendar {
    pub fn with_events(events: Vec<RemoteEvent>) -> Self {
        let calendar = MemoryCalendar::default();
        calendar.state().events = events.into_iter().map(|e| (e.id.clone(), e)).collect();
        calendar
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn event(&self, id: &str) -> Option<RemoteEvent> {
        self.state().events.get(id).cloned()
    }

    pub fn ids(&self) -> Vec<String> {
        self.state().events.keys().cloned().collect()
    }

    pub fn force_insert(&self, answer: Insert) {
        self.state().forced_insert = Some(answer);
    }

    pub fn fail_on_update(&self) {
        self.state().fail_on_update = true;
    }

    /// List every event overlapping the range, the way Google does.
    pub fn list_by_overlap(&self) {
        self.state().list_by_overlap = true;
    }

    /// Someone else deletes `id` right after the next listing.
    pub fn vanish_after_list(&self, id: &str) {
        self.state().vanish_after_list = Some(id.to_string());
    }
}

#[async_trait]
impl CalendarClient for MemoryCalendar {
    async fn list_calendars(&self) -> ShiftSyncResult<Vec<CalendarInfo>> {
        Ok(vec![CalendarInfo {
            id: "cal".to_string(),
            summary: "Work".to_string(),
            primary: true,
        }])
    }

    async fn list_events(
        &self,
        _calendar_id: &str,
        range: &DateRange,
    ) -> ShiftSyncResult<Vec<RemoteEvent>> {
        let mut state = self.state();
        state.calls.push(Call::List);
        let overlap = state.list_by_overlap;
        let listed: Vec<RemoteEvent> = state
            .events
            .values()
            .filter(|e| {
                if overlap {
                    // Untimed events are listed too, as Google lists all-day events.
                    match (e.start.instant(), e.end.instant()) {
                        (Ok(start), Ok(end)) => end > range.from && start < range.to,
                        _ => true,
                    }
                } else {
                    e.start.instant().is_ok_and(|start| range.contains(start))
                }
            })
            .cloned()
            .collect();
        if let Some(id) = state.vanish_after_list.take() {
            state.events.remove(&id);
            state.deleted.insert(id);
        }
        Ok(listed)
    }

    async fn insert_event(&self, _calendar_id: &str, event: &RemoteEvent) -> ShiftSyncResult<Insert> {
        let mut state = self.state();
        state.calls.push(Call::Insert(event.id.clone()));
        if let Some(answer) = state.forced_insert {
            return Ok(answer);
        }
        if state.events.contains_key(&event.id) || state.deleted.contains(&event.id) {
            return Ok(Insert::AlreadyExists);
        }
        state.events.insert(event.id.clone(), event.clone());
        Ok(Insert::Inserted)
    }

    async fn update_event(&self, _calendar_id: &str, event: &RemoteEvent) -> ShiftSyncResult<Update> {
        let mut state = self.state();
        state.calls.push(Call::Update(event.id.clone()));
        if state.fail_on_update {
            return Err(ShiftSyncError::Request {
                method: "PUT".to_string(),
                url: format!("memory://{}", event.id),
                status: 500,
                body: "boom".to_string(),
            });
        }
        let known = state.events.contains_key(&event.id) || state.deleted.remove(&event.id);
        if !known {
            return Ok(Update::NotFound);
        }
        state.events.insert(event.id.clone(), event.clone());
        Ok(Update::Updated)
    }

    async fn delete_event(&self, _calendar_id: &str, event_id: &str) -> ShiftSyncResult<bool> {
        let mut state = self.state();
        state.calls.push(Call::Delete(event_id.to_string()));
        if state.events.remove(event_id).is_none() {
            return Ok(false);
        }
        state.deleted.insert(event_id.to_string());
        Ok(true)
    }
}
