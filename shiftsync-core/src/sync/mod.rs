//! Reconciliation of a schedule against the remote calendar.

mod reconcile;
mod sync_result;
mod upsert;

pub use reconcile::{Reconciler, reconcile, required_events};
pub use sync_result::SyncResult;
pub use upsert::{TryFirst, UpsertOutcome, UpsertState, upsert_event};
