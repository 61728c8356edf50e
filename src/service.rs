//! Two-phase analytics surface for the presentation layer.
//!
//! Every derived value has a pure accessor (read the store, never
//! fetch) and an explicit `ensure_*` loader (fetch, derive, write the
//! store). Loaders run under a child of the service's shutdown token
//! and abandon without writing when cancelled; a failed fetch leaves
//! the slot unset so the next ensure retries.

use anyhow::{Context, Result};
use futures::future::join_all;
use log::{info, warn};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::blocks::resolve_blocks;
use crate::config::Settings;
use crate::metrics::{
    daily_liquidity_series, pools_ever_held, position_returns, principal_for_pair,
    share_value_series, HistoryWindow,
};
use crate::models::{
    LiquidityPositionSnapshot, LiquiditySeriesPoint, MiningPosition, PositionReturns,
    ShareValueSnapshot, Timeframe, Transactions,
};
use crate::store::AccountStore;
use crate::subgraph::{ops, SubgraphClient};
use crate::utils::{trailing_daily_timestamps, unix_now};

/// The client-side analytics service.
///
/// Holds the subgraph client, the injected per-account store, and the
/// shutdown token in-flight loads are tied to.
pub struct Analytics {
    client: SubgraphClient,
    store: AccountStore,
    settings: Arc<Settings>,
    shutdown: CancellationToken,
    /// Liquidity-chart window start per account; only ever widens.
    windows: Mutex<rustc_hash::FxHashMap<String, HistoryWindow>>,
}

impl Analytics {
    pub fn new(settings: Arc<Settings>) -> Result<Self> {
        let client =
            SubgraphClient::new(&settings.subgraph).context("Failed to build subgraph client")?;
        let store = AccountStore::new(&settings.cache);

        Ok(Self {
            client,
            store,
            settings,
            shutdown: CancellationToken::new(),
            windows: Mutex::new(rustc_hash::FxHashMap::default()),
        })
    }

    /// Token cancelled when the service shuts down. Callers running
    /// refresh loops should select against a child of it.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Cancel every in-flight load. Cancelled loads never write.
    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    /// Direct store access for consumers wiring their own reads.
    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    // ============================================
    // Pure Accessors
    // ============================================

    pub async fn transactions(&self, account: &str) -> Option<Arc<Transactions>> {
        self.store.transactions(account).await
    }

    pub async fn snapshots(&self, account: &str) -> Option<Arc<Vec<LiquidityPositionSnapshot>>> {
        self.store.snapshots(account).await
    }

    pub async fn positions(&self, account: &str) -> Option<Arc<Vec<PositionReturns>>> {
        self.store.positions(account).await
    }

    /// Staked positions. No staking contracts are indexed yet, so this
    /// is always empty.
    pub async fn mining_positions(&self, _account: &str) -> Vec<MiningPosition> {
        Vec::new()
    }

    pub async fn pair_returns(
        &self,
        account: &str,
        pair: &str,
    ) -> Option<Arc<Vec<ShareValueSnapshot>>> {
        self.store.pair_returns(account, pair).await
    }

    pub async fn liquidity_history(
        &self,
        account: &str,
    ) -> Option<Arc<Vec<LiquiditySeriesPoint>>> {
        self.store.liquidity_history(account).await
    }

    /// Drop an account's cached slots so the next ensure refetches.
    pub async fn invalidate(&self, account: &str) {
        self.store.invalidate_account(account).await;
    }

    // ============================================
    // Explicit Loaders
    // ============================================

    pub async fn ensure_transactions(&self, account: &str) -> Result<()> {
        if self.store.transactions(account).await.is_some() {
            return Ok(());
        }

        let token = self.shutdown.child_token();
        let fetched = tokio::select! {
            _ = token.cancelled() => return Ok(()),
            result = ops::user_transactions(&self.client, account) => {
                result.context("Failed to fetch user transactions")?
            },
        };

        self.store
            .set_transactions(account, Arc::new(fetched))
            .await;
        Ok(())
    }

    pub async fn ensure_snapshots(&self, account: &str) -> Result<()> {
        if self.store.snapshots(account).await.is_some() {
            return Ok(());
        }

        let token = self.shutdown.child_token();
        let mut fetched = tokio::select! {
            _ = token.cancelled() => return Ok(()),
            result = ops::user_snapshots(&self.client, account) => {
                result.context("Failed to fetch position snapshots")?
            },
        };

        // derived collections downstream assume chronological input
        fetched.sort_by_key(|snapshot| snapshot.timestamp);

        info!(
            "Fetched {} position snapshots for {}",
            fetched.len(),
            account
        );
        self.store.set_snapshots(account, Arc::new(fetched)).await;
        Ok(())
    }

    /// Fetch current positions and enrich them with return metrics.
    ///
    /// The return computation is deferred until pool state, snapshot
    /// history, and the native price are all present and non-empty; if
    /// any is missing the slot stays unset and the next ensure retries.
    pub async fn ensure_positions(&self, account: &str) -> Result<()> {
        if self.store.positions(account).await.is_some() {
            return Ok(());
        }

        self.ensure_snapshots(account).await?;
        let Some(snapshots) = self.store.snapshots(account).await else {
            return Ok(()); // cancelled mid-load
        };

        let token = self.shutdown.child_token();
        let (positions, native_price) = tokio::select! {
            _ = token.cancelled() => return Ok(()),
            result = async {
                let positions = ops::user_positions(&self.client, account).await?;
                let native_price = ops::native_price(&self.client).await?;
                anyhow::Ok((positions, native_price))
            } => result.context("Failed to fetch positions")?,
        };

        if positions.is_empty() {
            self.store.set_positions(account, Arc::new(Vec::new())).await;
            return Ok(());
        }

        if snapshots.is_empty() || native_price <= 0.0 {
            warn!(
                "Deferring return computation for {} (missing inputs)",
                account
            );
            return Ok(());
        }

        let transactions = self.store.transactions(account).await;
        let enriched: Vec<PositionReturns> = positions
            .iter()
            .map(|position| {
                let mut returns = position_returns(position, native_price, &snapshots);
                if let Some(transactions) = &transactions {
                    returns.principal = principal_for_pair(transactions, &position.pair.id);
                }
                returns
            })
            .collect();

        self.store.set_positions(account, Arc::new(enriched)).await;
        Ok(())
    }

    /// Build the trailing share-value/ROI series for one pair.
    pub async fn ensure_pair_returns(&self, account: &str, pair: &str) -> Result<()> {
        if self.store.pair_returns(account, pair).await.is_some() {
            return Ok(());
        }

        let timestamps = trailing_daily_timestamps(
            unix_now(),
            self.settings.history.share_value_window_days,
        );

        let token = self.shutdown.child_token();
        let series = tokio::select! {
            _ = token.cancelled() => return Ok(()),
            result = async {
                let blocks = resolve_blocks(
                    &self.client,
                    &timestamps,
                    self.settings.subgraph.block_page_size,
                )
                .await?;
                share_value_series(
                    &self.client,
                    pair,
                    &blocks,
                    self.settings.subgraph.share_value_page_size,
                )
                .await
            } => result.context("Failed to build share value series")?,
        };

        self.store
            .set_pair_returns(account, pair, Arc::new(series))
            .await;
        Ok(())
    }

    /// Build the daily USD liquidity series for one account.
    pub async fn ensure_liquidity_history(
        &self,
        account: &str,
        timeframe: Timeframe,
    ) -> Result<()> {
        if self.store.liquidity_history(account).await.is_some() {
            return Ok(());
        }

        self.ensure_snapshots(account).await?;
        let Some(snapshots) = self.store.snapshots(account).await else {
            return Ok(()); // cancelled mid-load
        };

        let now = unix_now();
        let window_start = {
            let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
            windows
                .entry(account.to_string())
                .or_default()
                .widen(timeframe, now)
        };

        let pools = pools_ever_held(&snapshots);

        let token = self.shutdown.child_token();
        let day_datas = tokio::select! {
            _ = token.cancelled() => return Ok(()),
            result = ops::pair_day_datas(&self.client, &pools, window_start) => {
                result.context("Failed to fetch pair day data")?
            },
        };

        let series = daily_liquidity_series(&snapshots, &day_datas, window_start, now);
        self.store
            .set_liquidity_history(account, Arc::new(series))
            .await;
        Ok(())
    }

    /// Warm every slot for one account, fanning out the independent
    /// per-pair series loads.
    pub async fn refresh_account(&self, account: &str, timeframe: Timeframe) -> Result<()> {
        let start = Instant::now();

        self.ensure_transactions(account).await?;
        self.ensure_snapshots(account).await?;
        self.ensure_positions(account).await?;
        self.ensure_liquidity_history(account, timeframe).await?;

        if let Some(positions) = self.store.positions(account).await {
            let loads = positions
                .iter()
                .map(|position| self.ensure_pair_returns(account, &position.position.pair.id));
            for result in join_all(loads).await {
                if let Err(e) = result {
                    warn!("Pair return series failed for {}: {:#}", account, e);
                }
            }
        }

        info!("Refreshed {} in {:?}", account, start.elapsed());
        Ok(())
    }
}
