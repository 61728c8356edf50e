use serde::Deserialize;

use super::{de, PairData};

/// Transaction hash and inclusion time shared by all event kinds.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRef {
    pub id: String,
    #[serde(deserialize_with = "de::u64_from_decimal")]
    pub timestamp: u64,
}

/// Liquidity-add event attributed to an account.
#[derive(Debug, Clone, Deserialize)]
pub struct MintTransaction {
    pub transaction: TransactionRef,
    pub pair: PairData,
    pub to: String,
    #[serde(default, deserialize_with = "de::f64_from_decimal")]
    pub liquidity: f64,
    #[serde(default, deserialize_with = "de::f64_from_decimal")]
    pub amount0: f64,
    #[serde(default, deserialize_with = "de::f64_from_decimal")]
    pub amount1: f64,
    #[serde(
        rename = "amountUSD",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub amount_usd: f64,
}

/// Liquidity-remove event attributed to an account.
#[derive(Debug, Clone, Deserialize)]
pub struct BurnTransaction {
    pub transaction: TransactionRef,
    pub pair: PairData,
    pub sender: String,
    #[serde(default, deserialize_with = "de::f64_from_decimal")]
    pub liquidity: f64,
    #[serde(default, deserialize_with = "de::f64_from_decimal")]
    pub amount0: f64,
    #[serde(default, deserialize_with = "de::f64_from_decimal")]
    pub amount1: f64,
    #[serde(
        rename = "amountUSD",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub amount_usd: f64,
}

/// Swap event attributed to an account.
#[derive(Debug, Clone, Deserialize)]
pub struct SwapTransaction {
    pub transaction: TransactionRef,
    pub pair: PairData,
    pub to: String,
    #[serde(
        rename = "amount0In",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub amount0_in: f64,
    #[serde(
        rename = "amount1In",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub amount1_in: f64,
    #[serde(
        rename = "amount0Out",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub amount0_out: f64,
    #[serde(
        rename = "amount1Out",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub amount1_out: f64,
    #[serde(
        rename = "amountUSD",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub amount_usd: f64,
}

/// An account's full on-chain activity as returned by one query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transactions {
    #[serde(default)]
    pub mints: Vec<MintTransaction>,
    #[serde(default)]
    pub burns: Vec<BurnTransaction>,
    #[serde(default)]
    pub swaps: Vec<SwapTransaction>,
}

impl Transactions {
    pub fn is_empty(&self) -> bool {
        self.mints.is_empty() && self.burns.is_empty() && self.swaps.is_empty()
    }
}
