//! Typed operations against the exchange subgraph.
//!
//! Each operation binds a document from [`queries`](super::queries) to
//! its wire model. Alias-keyed documents (blocks, historical share
//! values) are executed by their owning components instead.

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;

use crate::models::{LiquidityPositionSnapshot, PairDayData, Position, Transactions};
use crate::utils::decimal_str_to_f64;

use super::paginate::paged_skip_query;
use super::queries;
use super::SubgraphClient;

/// Fetch all mints, burns, and swaps attributed to an account.
pub async fn user_transactions(client: &SubgraphClient, account: &str) -> Result<Transactions> {
    client
        .exchange_query(queries::USER_TRANSACTIONS, json!({ "user": account }))
        .await
}

/// Fetch an account's complete liquidity-position snapshot history.
///
/// The backend caps each page at 1000 records with an implicit server
/// order; a short page signals end-of-data.
pub async fn user_snapshots(
    client: &SubgraphClient,
    account: &str,
) -> Result<Vec<LiquidityPositionSnapshot>> {
    #[derive(Deserialize)]
    struct SnapshotPage {
        #[serde(rename = "liquidityPositionSnapshots", default)]
        snapshots: Vec<LiquidityPositionSnapshot>,
    }

    paged_skip_query(queries::SNAPSHOT_PAGE_SIZE, |skip| async move {
        let page: SnapshotPage = client
            .exchange_query(
                queries::USER_SNAPSHOTS.as_str(),
                json!({ "user": account, "skip": skip }),
            )
            .await?;
        Ok(page.snapshots)
    })
    .await
}

/// Fetch an account's current liquidity positions with live pair state.
pub async fn user_positions(client: &SubgraphClient, account: &str) -> Result<Vec<Position>> {
    #[derive(Deserialize)]
    struct PositionsData {
        #[serde(rename = "liquidityPositions", default)]
        positions: Vec<Position>,
    }

    let data: PositionsData = client
        .exchange_query(queries::USER_POSITIONS, json!({ "user": account }))
        .await?;
    Ok(data.positions)
}

/// Bulk-fetch daily aggregate state for a pool list since `start_date`.
pub async fn pair_day_datas(
    client: &SubgraphClient,
    pairs: &[String],
    start_date: u64,
) -> Result<Vec<PairDayData>> {
    #[derive(Deserialize)]
    struct DayData {
        #[serde(rename = "pairDayDatas", default)]
        days: Vec<PairDayData>,
    }

    if pairs.is_empty() {
        return Ok(Vec::new());
    }

    let data: DayData = client
        .exchange_query(
            queries::PAIR_DAY_DATAS_BULK,
            json!({ "pairs": pairs, "startTimestamp": start_date }),
        )
        .await?;
    Ok(data.days)
}

/// Fetch the current native-asset USD price.
pub async fn native_price(client: &SubgraphClient) -> Result<f64> {
    #[derive(Deserialize)]
    struct Bundle {
        #[serde(rename = "ethPrice", default)]
        eth_price: String,
    }
    #[derive(Deserialize)]
    struct BundleData {
        bundle: Option<Bundle>,
    }

    let data: BundleData = client
        .exchange_query(queries::NATIVE_PRICE, serde_json::Value::Null)
        .await?;

    Ok(data
        .bundle
        .and_then(|b| decimal_str_to_f64(&b.eth_price))
        .unwrap_or(0.0))
}
