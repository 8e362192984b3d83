//! Relative time ranges and their resolution to absolute bounds.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// A relative time window selectable in monitoring views.
///
/// A range only becomes an absolute timestamp at the moment a request is
/// issued: [`TimeRange::resolve`] subtracts the window from the given
/// instant and must be re-evaluated on every call, never cached across
/// polling ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum TimeRange {
    Minutes1,
    Minutes10,
    #[default]
    Hours1,
    Hours2,
    Hours3,
    Hours12,
    Days1,
    Weeks1,
    Months1,
}

impl TimeRange {
    /// All selectable ranges, in ascending order.
    pub const ALL: [TimeRange; 9] = [
        TimeRange::Minutes1,
        TimeRange::Minutes10,
        TimeRange::Hours1,
        TimeRange::Hours2,
        TimeRange::Hours3,
        TimeRange::Hours12,
        TimeRange::Days1,
        TimeRange::Weeks1,
        TimeRange::Months1,
    ];

    /// The wire label, as used in range selectors and request parameters.
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Minutes1 => "1m",
            TimeRange::Minutes10 => "10m",
            TimeRange::Hours1 => "1h",
            TimeRange::Hours2 => "2h",
            TimeRange::Hours3 => "3h",
            TimeRange::Hours12 => "12h",
            TimeRange::Days1 => "1d",
            TimeRange::Weeks1 => "1w",
            TimeRange::Months1 => "1mo",
        }
    }

    /// The length of the window. A month is a fixed 30 days.
    pub fn duration(&self) -> Duration {
        match self {
            TimeRange::Minutes1 => Duration::minutes(1),
            TimeRange::Minutes10 => Duration::minutes(10),
            TimeRange::Hours1 => Duration::hours(1),
            TimeRange::Hours2 => Duration::hours(2),
            TimeRange::Hours3 => Duration::hours(3),
            TimeRange::Hours12 => Duration::hours(12),
            TimeRange::Days1 => Duration::days(1),
            TimeRange::Weeks1 => Duration::weeks(1),
            TimeRange::Months1 => Duration::days(30),
        }
    }

    /// The absolute lower bound of the window, relative to `now`.
    pub fn resolve(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration()
    }

    /// The lower bound relative to the current instant.
    pub fn resolve_now(&self) -> DateTime<Utc> {
        self.resolve(Utc::now())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeRange {
    type Err = ParseTimeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .iter()
            .copied()
            .find(|r| r.label() == s)
            .ok_or_else(|| ParseTimeRangeError(s.to_string()))
    }
}

impl TryFrom<String> for TimeRange {
    type Error = ParseTimeRangeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.label().to_string()
    }
}

/// Error returned when a string is not a known range label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeRangeError(String);

impl fmt::Display for ParseTimeRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown time range label: {:?}", self.0)
    }
}

impl std::error::Error for ParseTimeRangeError {}

/// Serialize a timestamp in the fixed wire format used for `date_from`
/// parameters: ISO-8601 with second precision and a `Z` suffix.
pub fn wire_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
