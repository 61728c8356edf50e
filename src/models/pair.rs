use serde::Deserialize;

use super::de;

/// Token metadata as embedded in pair-level query results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenData {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    /// Token price denominated in the chain's native asset.
    #[serde(
        rename = "derivedETH",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub derived_native: f64,
}

/// Current aggregate state of one liquidity pool.
///
/// Some query shapes omit `totalSupply` or `derivedETH`; those fields
/// default to zero and downstream computations guard against it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PairData {
    pub id: String,
    #[serde(default)]
    pub token0: TokenData,
    #[serde(default)]
    pub token1: TokenData,
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
        rename = "totalSupply",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub total_supply: f64,
}

/// One pool's aggregate state for one UTC day.
///
/// Query Patterns:
///   - "Value an LP token balance held on day D" (balance / totalSupply * reserveUSD)
#[derive(Debug, Clone, Deserialize)]
pub struct PairDayData {
    #[serde(rename = "pairAddress")]
    pub pair_address: String,
    /// Day-bucket start (unix seconds, midnight UTC).
    #[serde(deserialize_with = "de::u64_from_decimal")]
    pub date: u64,
    #[serde(
        rename = "totalSupply",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub total_supply: f64,
    #[serde(
        rename = "reserveUSD",
        default,
        deserialize_with = "de::f64_from_decimal"
    )]
    pub reserve_usd: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pair_data_parses_string_decimals() {
        let pair: PairData = serde_json::from_value(json!({
            "id": "0xpair",
            "token0": { "id": "0xa", "symbol": "WETH", "derivedETH": "1" },
            "token1": { "id": "0xb", "symbol": "USDC", "derivedETH": "0.0005" },
            "reserve0": "100.5",
            "reserve1": "200000",
            "reserveUSD": "400000.25",
            "totalSupply": "4000"
        }))
        .unwrap();

        assert_eq!(pair.reserve_usd, 400_000.25);
        assert_eq!(pair.total_supply, 4_000.0);
        assert_eq!(pair.token1.derived_native, 0.0005);
    }

    #[test]
    fn test_pair_data_tolerates_missing_fields() {
        let pair: PairData = serde_json::from_value(json!({ "id": "0xpair" })).unwrap();
        assert_eq!(pair.total_supply, 0.0);
        assert_eq!(pair.token0.id, "");
    }
}
