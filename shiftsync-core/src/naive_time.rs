//! Civil dates and times as they appear on the schedule page.
//!
//! These carry no timezone. They are wall-clock values in the schedule
//! source's zone and only become instants through [`CivilTime::to_instant`].

use std::fmt;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime as ChronoTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ShiftSyncError, ShiftSyncResult};

/// A calendar date without a timezone.
///
/// `day` (and `month`) may overflow; they normalize like date arithmetic,
/// so `2024-01-32` is `2024-02-01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NaiveDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// A wall-clock time. `hour` may be 24 for events that end at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NaiveTime {
    pub hour: u32,
    pub minute: u32,
}

/// A date and a wall-clock time, serialized as one flat object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NaiveDatetime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Anything that can be read as a wall-clock value in a fixed zone.
pub trait CivilTime {
    fn to_naive_datetime(&self) -> ShiftSyncResult<NaiveDateTime>;

    /// The absolute instant of this wall-clock value in `zone`.
    fn to_instant(&self, zone: Tz) -> ShiftSyncResult<DateTime<Utc>> {
        Ok(civil_to_utc(self.to_naive_datetime()?, zone))
    }
}

impl NaiveDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        NaiveDate { year, month, day }
    }

    /// The following day. Not normalized; conversion takes care of overflow.
    pub fn next_day(&self) -> Self {
        NaiveDate {
            day: self.day + 1,
            ..*self
        }
    }

    pub fn at(&self, time: NaiveTime) -> NaiveDatetime {
        NaiveDatetime {
            year: self.year,
            month: self.month,
            day: self.day,
            hour: time.hour,
            minute: time.minute,
        }
    }

    /// Normalize into a real calendar date using calendar arithmetic.
    pub fn to_chrono(&self) -> ShiftSyncResult<chrono::NaiveDate> {
        let months = i64::from(self.year) * 12 + i64::from(self.month) - 1;
        let year = i32::try_from(months.div_euclid(12))
            .map_err(|_| ShiftSyncError::InvalidSchedule(format!("Year out of range in {self}")))?;
        let month = (months.rem_euclid(12) + 1) as u32;

        chrono::NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first| first.checked_add_signed(Duration::days(i64::from(self.day) - 1)))
            .ok_or_else(|| ShiftSyncError::InvalidSchedule(format!("Date out of range: {self}")))
    }
}

impl CivilTime for NaiveDate {
    fn to_naive_datetime(&self) -> ShiftSyncResult<NaiveDateTime> {
        Ok(self.to_chrono()?.and_time(ChronoTime::MIN))
    }
}

impl NaiveDatetime {
    pub fn date(&self) -> NaiveDate {
        NaiveDate {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }

    pub fn time(&self) -> NaiveTime {
        NaiveTime {
            hour: self.hour,
            minute: self.minute,
        }
    }
}

impl CivilTime for NaiveDatetime {
    fn to_naive_datetime(&self) -> ShiftSyncResult<NaiveDateTime> {
        if self.hour > 24 || self.minute > 59 || (self.hour == 24 && self.minute > 0) {
            return Err(ShiftSyncError::InvalidSchedule(format!(
                "Time out of range: {self}"
            )));
        }

        // Hours are added as a duration so that 24:00 rolls into the next day.
        let offset = Duration::hours(i64::from(self.hour)) + Duration::minutes(i64::from(self.minute));
        self.date()
            .to_naive_datetime()?
            .checked_add_signed(offset)
            .ok_or_else(|| ShiftSyncError::InvalidSchedule(format!("Datetime out of range: {self}")))
    }
}

/// Resolve a wall-clock value in `zone` to UTC.
///
/// Repeated wall times (end of DST) resolve to the earlier instant. Skipped
/// wall times (start of DST) are read with the offset in force before the jump.
pub fn civil_to_utc(local: NaiveDateTime, zone: Tz) -> DateTime<Utc> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(a, b) => a.min(b).with_timezone(&Utc),
        LocalResult::None => {
            let before = zone
                .offset_from_utc_datetime(&(local - Duration::days(1)))
                .fix();
            (local - Duration::seconds(i64::from(before.local_minus_utc()))).and_utc()
        }
    }
}

impl fmt::Display for NaiveDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for NaiveDatetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}:{:02}", self.date(), self.hour, self.minute)
    }
}
