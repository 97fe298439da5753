//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
///
/// Serializes as an RFC 3339 string. Calendar-day bucketing anywhere in the
/// crate goes through [`Timestamp::utc_date`], so days are UTC days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    ///
    /// Saturates at the representable range instead of overflowing.
    pub fn minus_days(&self, days: i64) -> Self {
        match Duration::try_days(days) {
            Some(duration) => self.minus(duration),
            None => Self::saturated(days),
        }
    }

    /// Creates a new timestamp by subtracting a chrono duration, saturating
    /// at the representable range.
    pub fn minus(&self, duration: Duration) -> Self {
        match self.0.checked_sub_signed(duration) {
            Some(dt) => Self(dt),
            None => Self::saturated(duration.num_milliseconds()),
        }
    }

    fn saturated(direction: i64) -> Self {
        if direction >= 0 {
            Self(DateTime::<Utc>::MIN_UTC)
        } else {
            Self(DateTime::<Utc>::MAX_UTC)
        }
    }

    /// The UTC calendar date this instant falls on.
    pub fn utc_date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// RFC 3339 rendering used on the wire.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap())
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn minus_days_moves_back_whole_days() {
        let ts = at(2026, 3, 10, 12, 0, 0);
        assert_eq!(ts.minus_days(7), at(2026, 3, 3, 12, 0, 0));
    }

    #[test]
    fn minus_days_saturates_instead_of_overflowing() {
        let ts = at(2026, 3, 10, 12, 0, 0);
        assert_eq!(ts.minus_days(200_000_000).as_datetime(), &DateTime::<Utc>::MIN_UTC);
        assert_eq!(ts.minus_days(i64::MAX).as_datetime(), &DateTime::<Utc>::MIN_UTC);
        assert_eq!(ts.minus_days(-200_000_000).as_datetime(), &DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn minus_saturates_at_earliest_instant() {
        let earliest = Timestamp::from_datetime(DateTime::<Utc>::MIN_UTC);
        assert_eq!(earliest.minus(Duration::days(1)), earliest);
    }

    #[test]
    fn utc_date_ignores_time_of_day() {
        let late = at(2026, 3, 10, 23, 59, 59);
        let early = at(2026, 3, 10, 0, 0, 0);
        assert_eq!(late.utc_date(), early.utc_date());
        assert_eq!(late.utc_date().day(), 10);
    }

    #[test]
    fn duration_since_is_signed() {
        let a = at(2026, 3, 10, 12, 0, 0);
        let b = at(2026, 3, 10, 12, 0, 30);
        assert_eq!(b.duration_since(&a).num_seconds(), 30);
        assert_eq!(a.duration_since(&b).num_seconds(), -30);
    }

    #[test]
    fn timestamp_serializes_as_rfc3339() {
        let ts = at(2024, 1, 15, 10, 30, 0);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-01-15T10:30:00Z\"");
    }

    #[test]
    fn timestamp_deserializes_from_json() {
        let ts: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00Z\"").unwrap();
        assert_eq!(ts, at(2024, 1, 15, 10, 30, 0));
    }
}
