mod from_google;
mod to_google;

/// Convert from Google API types to shiftsync types
pub trait FromGoogle<T> {
    fn from_google(value: T) -> shiftsync_core::ShiftSyncResult<Self>
    where
        Self: Sized;
}

/// Convert to Google API types from shiftsync types
pub trait ToGoogle<T> {
    fn to_google(&self) -> T;
}
