//! Daily USD valuation of an account's total liquidity holdings.
//!
//! Reconstructs "current LP token balance per pool" as a function of
//! time from the account's snapshot history, then values each day's
//! balances against that pool's daily aggregate state.

use log::debug;
use rustc_hash::FxHashMap;

use crate::models::{LiquidityPositionSnapshot, LiquiditySeriesPoint, PairDayData, Timeframe};
use crate::utils::{day_index, safe_div, DAY_SECONDS};

/// Latest known balance for one pool while walking day buckets.
struct OwnershipEntry {
    lp_token_balance: f64,
    timestamp: u64,
}

/// History window start bound that only ever widens.
///
/// Re-derived whenever the timeframe changes; a later, narrower
/// candidate never moves an already-set start forward, so chart history
/// is never silently discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryWindow {
    start: Option<u64>,
}

impl HistoryWindow {
    /// Apply `timeframe` at `now`, returning the effective start bound.
    pub fn widen(&mut self, timeframe: Timeframe, now: u64) -> u64 {
        // one second before the window boundary, so records on the
        // boundary itself stay inside a date_gt filter
        let candidate = timeframe.window_start(now).saturating_sub(1);
        let effective = match self.start {
            Some(current) if current <= candidate => current,
            _ => {
                self.start = Some(candidate);
                candidate
            },
        };
        effective
    }

    pub fn start(&self) -> Option<u64> {
        self.start
    }
}

/// Distinct pool addresses the account ever held, in first-seen order.
pub fn pools_ever_held(snapshots: &[LiquidityPositionSnapshot]) -> Vec<String> {
    let mut pools = Vec::new();
    for snapshot in snapshots {
        if !pools.contains(&snapshot.pair.id) {
            pools.push(snapshot.pair.id.clone());
        }
    }
    pools
}

/// Build the day-by-day USD liquidity series.
///
/// Walks every UTC day bucket from the window start (clamped down to
/// the account's first activity day when that is earlier) through
/// yesterday; the still-accumulating current day is never emitted.
/// Each bucket folds that day's snapshots into the running ownership
/// map (latest snapshot per pool wins inside a bucket, balances carry
/// forward across buckets) and values every owned pool against its most
/// recent daily aggregate record at or before the bucket.
pub fn daily_liquidity_series(
    snapshots: &[LiquidityPositionSnapshot],
    day_datas: &[PairDayData],
    window_start: u64,
    now: u64,
) -> Vec<LiquiditySeriesPoint> {
    if snapshots.is_empty() {
        return Vec::new();
    }

    let mut history: Vec<&LiquidityPositionSnapshot> = snapshots.iter().collect();
    history.sort_by_key(|snapshot| snapshot.timestamp);

    let mut current_day = day_index(window_start);
    let today = day_index(now);

    // the window never cuts off the account's first activity
    let first_activity_day = day_index(history[0].timestamp);
    if first_activity_day < current_day {
        current_day = first_activity_day;
    }

    // per-pool day data, date-sorted so the prior-record scan below is
    // order-independent of what the backend returned
    let mut days_per_pool: FxHashMap<&str, Vec<&PairDayData>> = FxHashMap::default();
    for day_data in day_datas {
        days_per_pool
            .entry(day_data.pair_address.as_str())
            .or_default()
            .push(day_data);
    }
    for days in days_per_pool.values_mut() {
        days.sort_by_key(|day| day.date);
    }

    let mut ownership: FxHashMap<&str, OwnershipEntry> = FxHashMap::default();
    let mut series = Vec::new();
    let mut next_snapshot = 0;

    while current_day < today {
        let bucket_start = current_day * DAY_SECONDS;
        let bucket_end = bucket_start + DAY_SECONDS;

        // fold this bucket's snapshots into the ownership map; within a
        // bucket the latest snapshot per pool wins
        while next_snapshot < history.len() && history[next_snapshot].timestamp < bucket_end {
            let snapshot = history[next_snapshot];
            next_snapshot += 1;
            let entry = ownership
                .entry(snapshot.pair.id.as_str())
                .or_insert(OwnershipEntry {
                    lp_token_balance: snapshot.liquidity_token_balance,
                    timestamp: snapshot.timestamp,
                });
            if snapshot.timestamp >= entry.timestamp {
                entry.lp_token_balance = snapshot.liquidity_token_balance;
                entry.timestamp = snapshot.timestamp;
            }
        }

        let mut total_usd = 0.0;
        for (pool, entry) in &ownership {
            // most recent daily record dated at or before this bucket;
            // pools without one contribute nothing for the day
            let Some(reference) = days_per_pool.get(pool).and_then(|days| {
                days.iter()
                    .take_while(|day| day.date <= bucket_start)
                    .last()
            }) else {
                continue;
            };

            total_usd += safe_div(entry.lp_token_balance, reference.total_supply)
                * reference.reserve_usd;
        }

        series.push(LiquiditySeriesPoint {
            date: bucket_start,
            value_usd: total_usd,
        });

        current_day += 1;
    }

    debug!(
        "Built {}-day liquidity series across {} pools",
        series.len(),
        ownership.len()
    );

    series
}
