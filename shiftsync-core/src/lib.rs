//! Core of shiftsync: mirror a UKG work schedule into a calendar.
//!
//! - [`schedule`] and [`naive_time`] model the extracted schedule
//! - [`event`] turns schedule events into remote calendar events
//! - [`sync`] reconciles a calendar against a schedule
//! - [`sync_cache`] remembers what was last synced
//! - [`remote::CalendarClient`] is implemented by calendar providers

pub mod config;
pub mod constants;
pub mod date_range;
pub mod error;
pub mod etag;
pub mod event;
pub mod in_flight;
pub mod naive_time;
pub mod remote;
pub mod schedule;
pub mod sync;
pub mod sync_cache;

#[cfg(test)]
mod testing;

pub use error::{ShiftSyncError, ShiftSyncResult};
pub use etag::Etag;
pub use event::{EventDateTime, RemoteEvent, remote_id};
pub use schedule::{Bounds, Schedule, ScheduleEvent};
pub use sync::{Reconciler, SyncResult, reconcile};
