//! Timestamp to block-number resolution.
//!
//! The blocks subgraph is queried with one alias per timestamp, batched
//! through [`split_query`] to stay under the indexer's result-size
//! limit. A timestamp resolves to the first block mined inside
//! `[t, t + 600)`; timestamps with no block in the window are dropped.

use anyhow::Result;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::models::BlockEntry;
use crate::subgraph::{queries, split_query, SubgraphClient};
use crate::utils::json_to_u64;

/// Resolve timestamps to their nearest block numbers.
///
/// Output is sorted ascending by block number, not by input order;
/// callers needing input order must re-sort on the timestamp label.
/// An empty input returns immediately without issuing a query.
pub async fn resolve_blocks(
    client: &SubgraphClient,
    timestamps: &[u64],
    page_size: usize,
) -> Result<Vec<BlockEntry>> {
    if timestamps.is_empty() {
        return Ok(Vec::new());
    }

    let merged = split_query(timestamps, page_size, |window| {
        let document = queries::build_blocks_document(&window);
        async move {
            let data = client.blocks_query_raw(&document).await?;
            // keep every alias, including empty ones, so the page length
            // reflects what the backend actually answered
            Ok(data.into_iter().collect::<FxHashMap<String, Value>>())
        }
    })
    .await?;

    let mut entries = parse_block_aliases(&merged);
    entries.sort_by_key(|entry| entry.number);

    Ok(entries)
}

/// Parse `t{ts}` aliases back into resolved entries.
///
/// Aliases whose result list is empty or malformed are skipped, not
/// errored: a missing block simply thins the output.
fn parse_block_aliases(merged: &FxHashMap<String, Value>) -> Vec<BlockEntry> {
    let mut entries = Vec::with_capacity(merged.len());

    for (alias, value) in merged {
        let Some(timestamp) = alias
            .strip_prefix('t')
            .and_then(|raw| raw.parse::<u64>().ok())
        else {
            continue;
        };

        let Some(number) = value
            .as_array()
            .and_then(|blocks| blocks.first())
            .and_then(|block| block.get("number"))
            .and_then(json_to_u64)
        else {
            continue;
        };

        entries.push(BlockEntry { timestamp, number });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubgraphSettings;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_input_returns_without_querying() {
        // never dials out: resolution short-circuits before any request
        let client = SubgraphClient::new(&SubgraphSettings {
            exchange_url: "http://localhost:1/exchange".to_string(),
            blocks_url: "http://localhost:1/blocks".to_string(),
            http_timeout_secs: 1,
            block_page_size: 500,
            share_value_page_size: 50,
        })
        .unwrap();

        let blocks = resolve_blocks(&client, &[], 500).await.unwrap();
        assert!(blocks.is_empty());
    }

    fn fake_page() -> FxHashMap<String, Value> {
        let mut page = FxHashMap::default();
        // resolved out of input order
        page.insert("t2000".to_string(), json!([{ "number": "120" }]));
        page.insert("t1000".to_string(), json!([{ "number": "100" }]));
        // no block landed inside this window
        page.insert("t3000".to_string(), json!([]));
        page
    }

    #[test]
    fn test_parse_drops_unresolved_and_keeps_labels() {
        let entries = parse_block_aliases(&fake_page());
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.timestamp == 1000 && e.number == 100));
        assert!(entries.iter().any(|e| e.timestamp == 2000 && e.number == 120));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let first = {
            let mut e = parse_block_aliases(&fake_page());
            e.sort_by_key(|entry| entry.number);
            e
        };
        let second = {
            let mut e = parse_block_aliases(&fake_page());
            e.sort_by_key(|entry| entry.number);
            e
        };
        assert_eq!(first, second);
    }

    #[test]
    fn test_sorted_ascending_by_number() {
        let mut entries = parse_block_aliases(&fake_page());
        entries.sort_by_key(|entry| entry.number);
        assert!(entries.windows(2).all(|w| w[0].number <= w[1].number));
    }
}
