use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// All wall-clock timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Sample acquisition time in nanoseconds since the Unix epoch.
pub type TimestampNanos = i64;

const NANOS_PER_DAY: i64 = 86_400 * 1_000_000_000;

/// Convert a wall-clock timestamp into nanoseconds.
///
/// Saturates at `i64::MAX` for dates past 2262, which chrono cannot express
/// in nanoseconds.
pub fn to_nanos(at: Timestamp) -> TimestampNanos {
    at.timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// Current wall-clock time in nanoseconds.
pub fn now_nanos() -> TimestampNanos {
    to_nanos(Utc::now())
}

/// Convert nanoseconds back into a wall-clock timestamp.
pub fn from_nanos(nanos: TimestampNanos) -> Timestamp {
    DateTime::from_timestamp_nanos(nanos)
}

/// Inclusive nanosecond bounds covering whole UTC calendar days `from..=to`.
///
/// The end bound is the last nanosecond of `to`, so a reading taken at
/// 23:59:59.999 on the final day is still inside the range.
pub fn day_bounds_nanos(from: NaiveDate, to: NaiveDate) -> (TimestampNanos, TimestampNanos) {
    let start = Utc.from_utc_datetime(&from.and_time(NaiveTime::MIN));
    let end_day = Utc.from_utc_datetime(&to.and_time(NaiveTime::MIN));
    let start_nanos = to_nanos(start);
    let end_nanos = to_nanos(end_day).saturating_add(NANOS_PER_DAY - 1);
    (start_nanos, end_nanos)
}
