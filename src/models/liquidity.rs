use chrono::{Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One day of an account's total USD liquidity valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiquiditySeriesPoint {
    /// Day-bucket start (unix seconds, midnight UTC).
    pub date: u64,
    pub value_usd: f64,
}

/// UI-selected history window for the liquidity chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Timeframe {
    /// Trailing 7 days.
    Week,
    /// Calendar year to date.
    #[default]
    YearToDate,
    /// Trailing full year.
    AllTime,
}

impl Timeframe {
    /// Window start (unix seconds) for this timeframe, evaluated at `now`.
    pub fn window_start(&self, now: u64) -> u64 {
        let end = match Utc.timestamp_opt(now as i64, 0).single() {
            Some(t) => t,
            None => return 0,
        };
        let start = match self {
            Timeframe::Week => end - Duration::weeks(1),
            Timeframe::AllTime => end - Duration::days(365),
            Timeframe::YearToDate => {
                match Utc.with_ymd_and_hms(end.year(), 1, 1, 0, 0, 0).single() {
                    Some(t) => t,
                    None => return 0,
                }
            },
        };
        start.timestamp().max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-06-15 12:00:00 UTC
    const NOW: u64 = 1_686_830_400;

    #[test]
    fn test_week_window() {
        assert_eq!(Timeframe::Week.window_start(NOW), NOW - 7 * 86_400);
    }

    #[test]
    fn test_year_to_date_window() {
        // 2023-01-01 00:00:00 UTC
        assert_eq!(Timeframe::YearToDate.window_start(NOW), 1_672_531_200);
    }

    #[test]
    fn test_all_time_window() {
        assert_eq!(Timeframe::AllTime.window_start(NOW), NOW - 365 * 86_400);
    }
}
