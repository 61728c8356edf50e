use serde::Deserialize;

use super::{de, PairData};

/// Point-in-time record of a user's LP token holding for one pool.
///
/// Emitted by the subgraph on every liquidity add/remove. Immutable once
/// fetched; ordering key is `timestamp`.
#[derive(Debug, Clone, Deserialize)]
pub struct LiquidityPositionSnapshot {
    #[serde(deserialize_with = "de::u64_from_decimal")]
    pub timestamp: u64,
    #[serde(
        rename = "liquidityTokenBalance",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub liquidity_token_balance: f64,
    #[serde(
        rename = "liquidityTokenTotalSupply",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub liquidity_token_total_supply: f64,
    #[serde(default, deserialize_with = "de::f64_from_decimal")]
    pub reserve0: f64,
    #[serde(default, deserialize_with = "de::f64_from_decimal")]
    pub reserve1: f64,
    #[serde(
        rename = "reserveUSD",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub reserve_usd: f64,
    #[serde(
        rename = "token0PriceUSD",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub token0_price_usd: f64,
    #[serde(
        rename = "token1PriceUSD",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub token1_price_usd: f64,
    pub pair: PairData,
}
