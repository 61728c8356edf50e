use serde::Serialize;

/// Historical pool state at one block, with derived per-share pricing.
///
/// Built fresh per query from historical-state lookups; never stored
/// upstream.
#[derive(Debug, Clone, Serialize)]
pub struct ShareValueSnapshot {
    /// Input timestamp label the block was resolved from.
    pub timestamp: u64,
    pub block: u64,
    /// reserveUSD / totalSupply at the block.
    pub share_price_usd: f64,
    pub total_supply: f64,
    pub reserve0: f64,
    pub reserve1: f64,
    pub reserve_usd: f64,
    pub token0_price_usd: f64,
    pub token1_price_usd: f64,
    /// Ratio of this sample's share price to the series' first sample.
    /// The first sample is 1 by construction.
    pub roi_usd: f64,
}
