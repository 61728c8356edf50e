use serde::{Deserialize, Serialize};

use super::{de, PairData};

/// An account's current holding in one pool, as fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct Position {
    pub pair: PairData,
    #[serde(
        rename = "liquidityTokenBalance",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub liquidity_token_balance: f64,
}

/// Capital the account has put into (minus taken out of) one pool.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Principal {
    pub usd: f64,
    pub amount0: f64,
    pub amount1: f64,
}

/// A position enriched with computed return metrics.
///
/// `hodl_return_usd` is the value change of the deposited amounts had
/// they been held outside the pool; `pool_return_usd` is the fee gain
/// net of impermanent loss; `net_return_usd` is the realized change of
/// the LP share value itself.
#[derive(Debug, Clone)]
pub struct PositionReturns {
    pub position: Position,
    pub principal: Principal,
    pub hodl_return_usd: f64,
    pub net_return_usd: f64,
    pub pool_return_usd: f64,
    pub fees_usd: f64,
}

/// Staked-liquidity position. The exchange has no live staking
/// contracts indexed yet, so accessors always return an empty list.
#[derive(Debug, Clone)]
pub struct MiningPosition {
    pub pair_address: String,
    pub staked_balance: f64,
}
