//! Content fingerprints for schedules.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ShiftSyncResult;
use crate::schedule::Schedule;

/// Hex SHA-256 of a schedule's canonical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Etag(pub String);

impl Etag {
    /// Fingerprint a schedule.
    ///
    /// No normalization happens here: the same events in a different order
    /// hash differently, so producers must keep events sorted.
    pub fn of(schedule: &Schedule) -> ShiftSyncResult<Self> {
        let json = serde_json::to_vec(schedule)?;
        Ok(Etag(hex::encode(Sha256::digest(&json))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First few characters, for display.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::tests::{june, shift};

    #[test]
    fn test_equal_schedules_hash_equally() {
        let a = june(vec![shift("event-shift-1", 15, (9, 0), (17, 0))]);
        let b = Schedule::from_json(&serde_json::to_string(&a).unwrap()).unwrap();

        assert_eq!(Etag::of(&a).unwrap(), Etag::of(&b).unwrap());
        assert_eq!(Etag::of(&a).unwrap().as_str().len(), 64);
    }

    #[test]
    fn test_any_change_changes_the_hash() {
        let a = june(vec![shift("event-shift-1", 15, (9, 0), (17, 0))]);
        let b = june(vec![shift("event-shift-1", 15, (9, 0), (17, 30))]);
        let mut c = a.clone();
        c.bounds.end = c.bounds.end.next_day();

        let etag = Etag::of(&a).unwrap();
        assert_ne!(etag, Etag::of(&b).unwrap());
        assert_ne!(etag, Etag::of(&c).unwrap());
    }

    #[test]
    fn test_event_order_matters() {
        let first = shift("event-shift-1", 15, (9, 0), (17, 0));
        let second = shift("event-shift-2", 16, (9, 0), (17, 0));
        let sorted = june(vec![first.clone(), second.clone()]);
        let reversed = june(vec![second, first]);

        assert_ne!(Etag::of(&sorted).unwrap(), Etag::of(&reversed).unwrap());
    }
}
