use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Largest distance from the epoch, in milliseconds, of a valid instant
/// (100,000,000 days).
pub const MAX_DATE_MILLIS: i64 = 8_640_000_000_000_000;

/// An instant as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(i64);

impl Date {
    pub const fn from_millis(millis: i64) -> Self {
        Date(millis)
    }

    pub const fn millis(self) -> i64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        (-MAX_DATE_MILLIS..=MAX_DATE_MILLIS).contains(&self.0)
    }

    pub fn now() -> Self {
        SystemTime::now().into()
    }

    /// `None` for instants `SystemTime` cannot represent.
    pub fn to_system_time(self) -> Option<SystemTime> {
        let offset = Duration::from_millis(self.0.unsigned_abs());
        if self.0 >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        }
    }
}

impl From<SystemTime> for Date {
    fn from(time: SystemTime) -> Self {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_millis()).map(|ms| -ms).unwrap_or(i64::MIN),
        };
        Date(millis)
    }
}
