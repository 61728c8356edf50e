//! Historical share-value series for one pool.
//!
//! Resolved blocks are turned into one historical-state lookup each,
//! batched through [`split_query`]. Every resolvable block yields one
//! [`ShareValueSnapshot`]; blocks the backend has no state for are
//! skipped, leaving a sparse series rather than zero-filled samples.

use anyhow::Result;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::models::{BlockEntry, ShareValueSnapshot};
use crate::subgraph::{queries, split_query, SubgraphClient};
use crate::utils::{json_to_f64, safe_div};

/// Pool state parsed from one historical-state alias.
struct PairState {
    reserve0: f64,
    reserve1: f64,
    reserve_usd: f64,
    total_supply: f64,
    derived_native0: f64,
    derived_native1: f64,
}

/// Build the chronological share-value series for `pair_address` at the
/// given resolved blocks.
///
/// `roi_usd` of sample *i* is its share price relative to the first
/// sample; the first sample is 1 by construction. A zero first share
/// price degrades every ratio to 0 instead of propagating infinities.
pub async fn share_value_series(
    client: &SubgraphClient,
    pair_address: &str,
    blocks: &[BlockEntry],
    page_size: usize,
) -> Result<Vec<ShareValueSnapshot>> {
    if blocks.is_empty() {
        return Ok(Vec::new());
    }

    let merged = split_query(blocks, page_size, |window| {
        let document = queries::build_share_value_document(pair_address, &window);
        async move {
            let data = client.exchange_query_raw(&document).await?;
            Ok(data.into_iter().collect::<FxHashMap<String, Value>>())
        }
    })
    .await?;

    // chronological order regardless of how pages merged
    let mut ordered: Vec<BlockEntry> = blocks.to_vec();
    ordered.sort_by_key(|block| block.timestamp);

    Ok(build_series(&ordered, &merged))
}

/// Assemble snapshots from the merged alias map, in block order.
fn build_series(
    ordered: &[BlockEntry],
    merged: &FxHashMap<String, Value>,
) -> Vec<ShareValueSnapshot> {
    let mut series: Vec<ShareValueSnapshot> = Vec::with_capacity(ordered.len());
    let mut first_share_price = 0.0;

    for block in ordered {
        let Some(state) = merged
            .get(&format!("t{}", block.timestamp))
            .and_then(parse_pair_state)
        else {
            // backend has no state at this height: sparse output
            continue;
        };

        let native_price = merged
            .get(&format!("b{}", block.timestamp))
            .and_then(|bundle| bundle.get("ethPrice"))
            .and_then(json_to_f64)
            .unwrap_or(0.0);

        let share_price_usd = safe_div(state.reserve_usd, state.total_supply);
        if series.is_empty() {
            first_share_price = share_price_usd;
        }

        series.push(ShareValueSnapshot {
            timestamp: block.timestamp,
            block: block.number,
            share_price_usd,
            total_supply: state.total_supply,
            reserve0: state.reserve0,
            reserve1: state.reserve1,
            reserve_usd: state.reserve_usd,
            token0_price_usd: state.derived_native0 * native_price,
            token1_price_usd: state.derived_native1 * native_price,
            roi_usd: safe_div(share_price_usd, first_share_price),
        });
    }

    series
}

fn parse_pair_state(value: &Value) -> Option<PairState> {
    let object = value.as_object()?;

    let field = |key: &str| object.get(key).and_then(json_to_f64).unwrap_or(0.0);
    let derived = |token: &str| {
        object
            .get(token)
            .and_then(|t| t.get("derivedETH"))
            .and_then(json_to_f64)
            .unwrap_or(0.0)
    };

    Some(PairState {
        reserve0: field("reserve0"),
        reserve1: field("reserve1"),
        reserve_usd: field("reserveUSD"),
        total_supply: field("totalSupply"),
        derived_native0: derived("token0"),
        derived_native1: derived("token1"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(reserve_usd: f64, total_supply: f64) -> Value {
        json!({
            "reserve0": "10",
            "reserve1": "20000",
            "reserveUSD": reserve_usd.to_string(),
            "totalSupply": total_supply.to_string(),
            "token0": { "derivedETH": "1" },
            "token1": { "derivedETH": "0.0005" }
        })
    }

    fn merged_fixture() -> FxHashMap<String, Value> {
        let mut merged = FxHashMap::default();
        merged.insert("t100".to_string(), state(1000.0, 100.0));
        merged.insert("b100".to_string(), json!({ "ethPrice": "2000" }));
        merged.insert("t200".to_string(), state(1500.0, 100.0));
        merged.insert("b200".to_string(), json!({ "ethPrice": "2100" }));
        // t300 missing entirely: the pair had no state at that height
        merged.insert("t300".to_string(), json!(null));
        merged
    }

    fn blocks() -> Vec<BlockEntry> {
        vec![
            BlockEntry {
                timestamp: 100,
                number: 10,
            },
            BlockEntry {
                timestamp: 200,
                number: 20,
            },
            BlockEntry {
                timestamp: 300,
                number: 30,
            },
        ]
    }

    #[test]
    fn test_first_sample_roi_is_one() {
        let series = build_series(&blocks(), &merged_fixture());
        assert_eq!(series[0].roi_usd, 1.0);
    }

    #[test]
    fn test_roi_is_ratio_to_first_sample() {
        let series = build_series(&blocks(), &merged_fixture());
        // share price went 10 -> 15
        assert_eq!(series[1].roi_usd, 1.5);
    }

    #[test]
    fn test_unavailable_blocks_are_skipped_not_zero_filled() {
        let series = build_series(&blocks(), &merged_fixture());
        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|s| s.timestamp != 300));
    }

    #[test]
    fn test_token_prices_derived_from_bundle() {
        let series = build_series(&blocks(), &merged_fixture());
        assert_eq!(series[0].token0_price_usd, 2000.0);
        assert_eq!(series[0].token1_price_usd, 1.0);
    }

    #[test]
    fn test_zero_baseline_degrades_to_zero_roi() {
        let mut merged = FxHashMap::default();
        merged.insert("t100".to_string(), state(0.0, 100.0));
        merged.insert("t200".to_string(), state(1500.0, 100.0));
        let series = build_series(&blocks()[..2], &merged);
        assert_eq!(series[0].roi_usd, 0.0);
        assert_eq!(series[1].roi_usd, 0.0);
    }
}
