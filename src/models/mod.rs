//! Wire and derived data types for the analytics layer.
//!
//! Wire types mirror the subgraph schema (camelCase fields, decimal
//! quantities serialized as strings). Derived types are computed locally
//! and never fetched.

mod block;
mod liquidity;
mod pair;
mod position;
mod share_value;
mod snapshot;
mod transaction;

pub use block::BlockEntry;
pub use liquidity::{LiquiditySeriesPoint, Timeframe};
pub use pair::{PairData, PairDayData, TokenData};
pub use position::{MiningPosition, Position, PositionReturns, Principal};
pub use share_value::ShareValueSnapshot;
pub use snapshot::LiquidityPositionSnapshot;
pub use transaction::{
    BurnTransaction, MintTransaction, SwapTransaction, TransactionRef, Transactions,
};

// ============================================
// Serde Helpers
// ============================================

pub(crate) mod de {
    //! Deserializers for subgraph numeric fields.
    //!
    //! BigDecimal fields arrive as strings, Int fields as numbers, and a
    //! few fields switch shape between entities. Unparseable values
    //! degrade to zero instead of failing the whole page.

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::utils::{json_to_f64, json_to_u64};

    pub fn f64_from_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(json_to_f64(&value).unwrap_or(0.0))
    }

    pub fn u64_from_decimal<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(json_to_u64(&value).unwrap_or(0))
    }
}
