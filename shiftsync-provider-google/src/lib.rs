//! Google Calendar client for shiftsync.
//!
//! Implements [`shiftsync_core::remote::CalendarClient`] on top of the
//! Calendar v3 REST API. Authentication is the caller's business: the client
//! is handed a ready-to-use OAuth access token.

mod api;
mod convert;
mod types;

pub use api::GoogleCalendar;
