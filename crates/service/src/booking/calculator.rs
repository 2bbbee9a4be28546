use chrono::{DateTime, Duration, Utc};

/// End of the slot reserved for a service starting at `start`.
///
/// Pure arithmetic: no check that the slot is free, in the future or within
/// opening hours.
pub fn compute_end_time(start: DateTime<Utc>, duration_minutes: i32) -> DateTime<Utc> {
    start + Duration::minutes(i64::from(duration_minutes))
}
