//! UTC day-bucket and sampling-window helpers.

use chrono::Utc;

/// Seconds in a UTC calendar day.
pub const DAY_SECONDS: u64 = 86_400;

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Start of the UTC day containing `timestamp`.
#[inline]
pub fn day_bucket(timestamp: u64) -> u64 {
    (timestamp / DAY_SECONDS) * DAY_SECONDS
}

/// Index of the UTC day containing `timestamp` (days since epoch).
#[inline]
pub fn day_index(timestamp: u64) -> u64 {
    timestamp / DAY_SECONDS
}

/// Ascending daily sample timestamps for the trailing `days` days.
///
/// Returns `days + 1` timestamps ending at `now`, one per day, so a
/// 7-day window yields 8 samples and 7 full day-over-day periods.
pub fn trailing_daily_timestamps(now: u64, days: u64) -> Vec<u64> {
    (0..=days)
        .rev()
        .map(|back| now.saturating_sub(back * DAY_SECONDS))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bucket_floors_to_day_start() {
        assert_eq!(day_bucket(0), 0);
        assert_eq!(day_bucket(86_399), 0);
        assert_eq!(day_bucket(86_400), 86_400);
        assert_eq!(day_bucket(1_700_000_000), 1_699_920_000);
    }

    #[test]
    fn test_trailing_daily_timestamps_shape() {
        let samples = trailing_daily_timestamps(8 * DAY_SECONDS, 7);
        assert_eq!(samples.len(), 8);
        assert_eq!(samples.first(), Some(&DAY_SECONDS));
        assert_eq!(samples.last(), Some(&(8 * DAY_SECONDS)));
        // strictly ascending
        assert!(samples.windows(2).all(|w| w[0] < w[1]));
    }
}
