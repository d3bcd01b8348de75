use crate::Timestamp;
use chrono::{TimeDelta, Timelike};

const NANOS_PER_SEC: i64 = 1_000_000_000;
const NANOS_PER_MIN: i64 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MIN;

/// Bucket width used when flooring record timestamps.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Granularity {
    /// One bucket per second.
    Second,

    /// One bucket per minute.
    Minute,

    /// One bucket per hour.
    Hour,

    /// One bucket per calendar day.
    Day,
}

impl Granularity {
    /// Floors a timestamp to the start of its bucket.
    ///
    /// Works over the timestamp's local clock components, so the bucket
    /// boundary is local to the record's UTC offset, and the offset is
    /// preserved. Sub-second fractions are zeroed at every granularity,
    /// and a leap second floors together with the second it extends.
    ///
    /// Flooring is idempotent, and monotonic for timestamps in the same
    /// offset.
    #[must_use]
    pub fn floor(self, ts: Timestamp) -> Timestamp {
        let time = ts.time();

        // NOTE: chrono surfaces a leap second as second 59 with nanosecond
        // past 1s; that overflow must stay in the excess, since subtraction
        // normalizes it back into a plain second
        let nanos = i64::from(time.nanosecond());

        let excess = match self {
            Self::Second => nanos,
            Self::Minute => i64::from(time.second()) * NANOS_PER_SEC + nanos,
            Self::Hour => {
                i64::from(time.minute()) * NANOS_PER_MIN
                    + i64::from(time.second()) * NANOS_PER_SEC
                    + nanos
            }
            Self::Day => {
                i64::from(time.hour()) * NANOS_PER_HOUR
                    + i64::from(time.minute()) * NANOS_PER_MIN
                    + i64::from(time.second()) * NANOS_PER_SEC
                    + nanos
            }
        };

        ts - TimeDelta::nanoseconds(excess)
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Second => "Second",
                Self::Minute => "Minute",
                Self::Hour => "Hour",
                Self::Day => "Day",
            },
        )
    }
}

impl std::str::FromStr for Granularity {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "second" => Ok(Self::Second),
            "minute" => Ok(Self::Minute),
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            _ => Err(crate::Error::UnknownGranularity(s.into())),
        }
    }
}
