//! Insert-or-update with fallback.
//!
//! Whether an event exists on the remote is only known as of the last
//! listing, so each write may be refused. The refusal moves the machine to
//! the opposite write; a second refusal means the remote changed twice
//! underneath us and is reported as a race.

use tracing::debug;

use crate::error::{ShiftSyncError, ShiftSyncResult};
use crate::event::RemoteEvent;
use crate::remote::{Insert, Remote, Update};

/// Which write to attempt first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryFirst {
    Insert,
    Update,
}

/// What actually happened on the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertState {
    Insert,
    Update,
    FallbackInsert,
    FallbackUpdate,
}

impl UpsertState {
    pub fn start(try_first: TryFirst) -> Self {
        match try_first {
            TryFirst::Insert => UpsertState::Insert,
            TryFirst::Update => UpsertState::Update,
        }
    }

    /// The write in this state went through.
    pub fn on_written(self) -> UpsertOutcome {
        match self {
            UpsertState::Insert | UpsertState::FallbackInsert => UpsertOutcome::Inserted,
            UpsertState::Update | UpsertState::FallbackUpdate => UpsertOutcome::Updated,
        }
    }

    /// The write in this state was refused. `None` once both writes were tried.
    pub fn on_refused(self) -> Option<UpsertState> {
        match self {
            UpsertState::Insert => Some(UpsertState::FallbackUpdate),
            UpsertState::Update => Some(UpsertState::FallbackInsert),
            UpsertState::FallbackInsert | UpsertState::FallbackUpdate => None,
        }
    }

    fn is_insert(self) -> bool {
        matches!(self, UpsertState::Insert | UpsertState::FallbackInsert)
    }
}

pub async fn upsert_event(
    remote: &Remote<'_>,
    event: &RemoteEvent,
    try_first: TryFirst,
) -> ShiftSyncResult<UpsertOutcome> {
    let mut state = UpsertState::start(try_first);

    loop {
        let written = if state.is_insert() {
            remote.insert_event(event).await? == Insert::Inserted
        } else {
            remote.update_event(event).await? == Update::Updated
        };

        if written {
            return Ok(state.on_written());
        }

        debug!(event_id = %event.id, ?state, "remote refused write, falling back");
        state = state
            .on_refused()
            .ok_or_else(|| ShiftSyncError::UpsertRace(event.id.clone()))?;
    }
}
