//! Per-account derived-data store.
//!
//! An explicit, injected store object with one TTL-bounded cache per
//! slot family. Reads are pure lookups; writes happen only from the
//! explicit ensure-loaders in [`service`](crate::service). Entries age
//! out after the configured TTL, so reference-price-dependent results
//! are recomputed instead of being served forever.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheSettings;
use crate::models::{
    LiquidityPositionSnapshot, LiquiditySeriesPoint, PositionReturns, ShareValueSnapshot,
    Transactions,
};

/// All cached derived data, keyed by account (and pair, for return
/// series).
///
/// Two concurrent loads of the same uninitialized key may both fetch
/// and both write; the writes are whole-value inserts, so the last one
/// stands intact and no partial merge can occur.
#[derive(Clone)]
pub struct AccountStore {
    transactions: Cache<String, Arc<Transactions>>,
    snapshots: Cache<String, Arc<Vec<LiquidityPositionSnapshot>>>,
    positions: Cache<String, Arc<Vec<PositionReturns>>>,
    pair_returns: Cache<(String, String), Arc<Vec<ShareValueSnapshot>>>,
    liquidity_history: Cache<String, Arc<Vec<LiquiditySeriesPoint>>>,
}

fn build_cache<K, V>(settings: &CacheSettings) -> Cache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .max_capacity(settings.max_accounts)
        .time_to_live(Duration::from_secs(settings.ttl_secs))
        .build()
}

impl AccountStore {
    pub fn new(settings: &CacheSettings) -> Self {
        // pair-return entries are keyed by (account, pair); invalidating
        // one account needs predicate invalidation over the composite key
        let pair_returns = Cache::builder()
            .max_capacity(settings.max_accounts)
            .time_to_live(Duration::from_secs(settings.ttl_secs))
            .support_invalidation_closures()
            .build();

        Self {
            transactions: build_cache(settings),
            snapshots: build_cache(settings),
            positions: build_cache(settings),
            pair_returns,
            liquidity_history: build_cache(settings),
        }
    }

    // ============================================
    // Pure Accessors
    // ============================================

    pub async fn transactions(&self, account: &str) -> Option<Arc<Transactions>> {
        self.transactions.get(account).await
    }

    pub async fn snapshots(&self, account: &str) -> Option<Arc<Vec<LiquidityPositionSnapshot>>> {
        self.snapshots.get(account).await
    }

    pub async fn positions(&self, account: &str) -> Option<Arc<Vec<PositionReturns>>> {
        self.positions.get(account).await
    }

    pub async fn pair_returns(
        &self,
        account: &str,
        pair: &str,
    ) -> Option<Arc<Vec<ShareValueSnapshot>>> {
        self.pair_returns
            .get(&(account.to_string(), pair.to_string()))
            .await
    }

    pub async fn liquidity_history(&self, account: &str) -> Option<Arc<Vec<LiquiditySeriesPoint>>> {
        self.liquidity_history.get(account).await
    }

    // ============================================
    // Writers
    // ============================================

    pub async fn set_transactions(&self, account: &str, value: Arc<Transactions>) {
        self.transactions.insert(account.to_string(), value).await;
    }

    pub async fn set_snapshots(
        &self,
        account: &str,
        value: Arc<Vec<LiquidityPositionSnapshot>>,
    ) {
        self.snapshots.insert(account.to_string(), value).await;
    }

    pub async fn set_positions(&self, account: &str, value: Arc<Vec<PositionReturns>>) {
        self.positions.insert(account.to_string(), value).await;
    }

    pub async fn set_pair_returns(
        &self,
        account: &str,
        pair: &str,
        value: Arc<Vec<ShareValueSnapshot>>,
    ) {
        self.pair_returns
            .insert((account.to_string(), pair.to_string()), value)
            .await;
    }

    pub async fn set_liquidity_history(
        &self,
        account: &str,
        value: Arc<Vec<LiquiditySeriesPoint>>,
    ) {
        self.liquidity_history
            .insert(account.to_string(), value)
            .await;
    }

    // ============================================
    // Invalidation
    // ============================================

    /// Drop every cached slot for one account, forcing the next ensure
    /// to refetch.
    pub async fn invalidate_account(&self, account: &str) {
        self.transactions.invalidate(account).await;
        self.snapshots.invalidate(account).await;
        self.positions.invalidate(account).await;
        self.liquidity_history.invalidate(account).await;

        let target = account.to_string();
        // registered closure invalidation; moka applies it lazily
        let _ = self
            .pair_returns
            .invalidate_entries_if(move |key, _| key.0 == target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AccountStore {
        AccountStore::new(&CacheSettings {
            ttl_secs: 300,
            max_accounts: 100,
        })
    }

    #[tokio::test]
    async fn test_reads_are_pure_and_miss_when_unset() {
        let store = store();
        assert!(store.transactions("0xuser").await.is_none());
        assert!(store.positions("0xuser").await.is_none());
        assert!(store.pair_returns("0xuser", "0xpair").await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_writes_leave_one_intact_value() {
        let store = store();

        fn series(len: usize) -> Arc<Vec<LiquiditySeriesPoint>> {
            Arc::new(
                (0..len)
                    .map(|i| LiquiditySeriesPoint {
                        date: i as u64 * 86_400,
                        value_usd: 1.0,
                    })
                    .collect(),
            )
        }

        // two in-flight loads for the same uncached key both complete
        let a = {
            let store = store.clone();
            tokio::spawn(
                async move { store.set_liquidity_history("0xuser", series(3)).await },
            )
        };
        let b = {
            let store = store.clone();
            tokio::spawn(
                async move { store.set_liquidity_history("0xuser", series(7)).await },
            )
        };
        a.await.unwrap();
        b.await.unwrap();

        // one whole value stands, never a merge of the two
        let cached = store.liquidity_history("0xuser").await.unwrap();
        assert!(cached.len() == 3 || cached.len() == 7);
    }

    #[tokio::test]
    async fn test_invalidate_account_clears_all_slots() {
        let store = store();
        store
            .set_transactions("0xuser", Arc::new(Transactions::default()))
            .await;
        store.set_snapshots("0xuser", Arc::new(Vec::new())).await;
        store
            .set_pair_returns("0xuser", "0xpair", Arc::new(Vec::new()))
            .await;

        store.invalidate_account("0xuser").await;
        // lazy invalidation must be observed through reads
        assert!(store.transactions("0xuser").await.is_none());
        assert!(store.snapshots("0xuser").await.is_none());
        assert!(store.pair_returns("0xuser", "0xpair").await.is_none());
    }

    #[tokio::test]
    async fn test_accounts_are_disjoint_slots() {
        let store = store();
        store
            .set_transactions("0xalice", Arc::new(Transactions::default()))
            .await;
        assert!(store.transactions("0xalice").await.is_some());
        assert!(store.transactions("0xbob").await.is_none());
    }
}
