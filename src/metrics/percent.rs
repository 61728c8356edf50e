//! Guarded percent-change helpers.
//!
//! Every division here can hit a zero or missing prior value; invalid
//! results are coerced to 0 so downstream formatting never sees NaN or
//! infinities.

/// Percent change between a current and a previous value.
///
/// Returns 0 when the previous value is 0 or the result is not finite.
#[inline]
pub fn percent_change(current: f64, previous: f64) -> f64 {
    let change = ((current - previous) / previous) * 100.0;
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

/// 24h delta and its percent change against the prior 24h delta.
///
/// Takes the value now, 24 hours ago, and 48 hours ago; returns
/// `(current_change, adjusted_percent_change)`. The adjusted change
/// compares the two day-over-day deltas, which filters out level shifts
/// that happened before the window.
pub fn two_day_percent_change(
    value_now: f64,
    value_24h_ago: f64,
    value_48h_ago: f64,
) -> (f64, f64) {
    let current_change = value_now - value_24h_ago;
    let previous_change = value_24h_ago - value_48h_ago;

    let adjusted = ((current_change - previous_change) / previous_change) * 100.0;
    if adjusted.is_finite() {
        (current_change, adjusted)
    } else {
        (current_change, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_change_basic() {
        assert_eq!(percent_change(110.0, 100.0), 10.0);
        assert_eq!(percent_change(90.0, 100.0), -10.0);
    }

    #[test]
    fn test_percent_change_zero_previous_guarded() {
        assert_eq!(percent_change(100.0, 0.0), 0.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_two_day_percent_change() {
        let (current, adjusted) = two_day_percent_change(300.0, 200.0, 100.0);
        assert_eq!(current, 100.0);
        assert_eq!(adjusted, 0.0);
    }

    #[test]
    fn test_two_day_percent_change_flat_history_guarded() {
        let (current, adjusted) = two_day_percent_change(150.0, 100.0, 100.0);
        assert_eq!(current, 50.0);
        // previous delta is 0: division guarded to 0
        assert_eq!(adjusted, 0.0);
    }
}
