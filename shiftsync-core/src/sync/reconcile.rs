//! Diff the required events against the calendar and converge them.

use std::collections::HashMap;

use chrono_tz::Tz;
use tracing::{debug, info};

use crate::date_range::DateRange;
use crate::error::{ShiftSyncError, ShiftSyncResult};
use crate::event::RemoteEvent;
use crate::in_flight::InFlight;
use crate::remote::{CalendarClient, Remote};
use crate::schedule::Schedule;
use crate::sync::{SyncResult, TryFirst, upsert_event};

/// Runs reconciliations, at most one at a time per calendar.
pub struct Reconciler<C> {
    client: C,
    zone: Tz,
    in_flight: InFlight,
}

impl<C: CalendarClient> Reconciler<C> {
    pub fn new(client: C, zone: Tz) -> Self {
        Reconciler {
            client,
            zone,
            in_flight: InFlight::default(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Reconcile `schedule` into `calendar_id`.
    ///
    /// A second call for the same calendar waits for the first to finish.
    pub async fn sync(&self, calendar_id: &str, schedule: &Schedule) -> ShiftSyncResult<SyncResult> {
        let _guard = self.in_flight.acquire(calendar_id).await;
        reconcile(&self.client, calendar_id, schedule, self.zone).await
    }
}

/// The calendar events `schedule` should produce, in schedule order.
pub fn required_events(schedule: &Schedule, zone: Tz) -> ShiftSyncResult<Vec<RemoteEvent>> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    let mut required = Vec::with_capacity(schedule.events.len());

    for event in &schedule.events {
        let remote = RemoteEvent::from_schedule(event, zone)?;
        if let Some(first) = owners.insert(remote.id.clone(), &event.id) {
            return Err(ShiftSyncError::DuplicateRemoteId {
                first: first.to_string(),
                second: event.id.clone(),
                remote_id: remote.id,
            });
        }
        required.push(remote);
    }

    Ok(required)
}

/// Make the calendar mirror the schedule within the schedule's bounds.
///
/// Every write is sequential and all inserts/updates happen before any
/// delete. The first failed write aborts the run; running again is safe.
pub async fn reconcile(
    client: &dyn CalendarClient,
    calendar_id: &str,
    schedule: &Schedule,
    zone: Tz,
) -> ShiftSyncResult<SyncResult> {
    schedule.validate()?;

    let remote = Remote::new(client, calendar_id);
    let required = required_events(schedule, zone)?;
    let range = DateRange::from_bounds(&schedule.bounds, zone)?;

    // Events are removed from this map as they are matched.
    let mut unclaimed = fetch_existing(&remote, &range).await?;

    let mut result = SyncResult::default();

    for event in &required {
        let try_first = match unclaimed.remove(&event.id) {
            Some(existing) if existing.is_equivalent(event) => continue,
            Some(_) => TryFirst::Update,
            None => TryFirst::Insert,
        };

        let outcome = upsert_event(&remote, event, try_first).await?;
        debug!(event_id = %event.id, ?outcome, "wrote event");
        result.record(outcome);
    }

    let mut leftovers: Vec<RemoteEvent> = unclaimed.into_values().collect();
    leftovers.sort_by(|a, b| {
        (&a.start.date_time, &a.id).cmp(&(&b.start.date_time, &b.id))
    });

    for event in leftovers {
        if remote.delete_event(&event.id).await? {
            debug!(event_id = %event.id, "deleted event");
            result.deleted += 1;
        } else {
            debug!(event_id = %event.id, "event already gone");
        }
    }

    info!(calendar_id, %result, "reconciled schedule");
    Ok(result)
}

async fn fetch_existing(
    remote: &Remote<'_>,
    range: &DateRange,
) -> ShiftSyncResult<HashMap<String, RemoteEvent>> {
    let events = remote.events(range).await?;

    info!(
        calendar_id = remote.calendar_id(),
        count = events.len(),
        from = %range.from_rfc3339(),
        to = %range.to_rfc3339(),
        "fetched calendar events"
    );
    debug!(?events, "fetched calendar events");

    // Clients may list by overlap. Events starting outside the window belong
    // to a neighbouring schedule and are never touched.
    Ok(events
        .into_iter()
        .filter(|e| {
            let inside = e.start.instant().is_ok_and(|start| range.contains(start));
            if !inside {
                debug!(event_id = %e.id, start = %e.start.date_time, "ignoring event starting outside window");
            }
            inside
        })
        .map(|e| (e.id.clone(), e))
        .collect())
}
