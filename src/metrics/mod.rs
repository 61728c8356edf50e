//! Derived-metrics computation pipeline.
//!
//! This module is organized into focused submodules:
//!
//! - [`share_value`] - historical per-share pool pricing and ROI series
//! - [`returns`] - per-position LP return decomposition
//! - [`liquidity`] - daily USD valuation of an account's holdings
//! - [`percent`] - guarded percent-change helpers

pub mod liquidity;
pub mod percent;
pub mod returns;
pub mod share_value;

pub use liquidity::{daily_liquidity_series, pools_ever_held, HistoryWindow};
pub use percent::{percent_change, two_day_percent_change};
pub use returns::{position_returns, principal_for_pair};
pub use share_value::share_value_series;
