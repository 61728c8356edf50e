use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::models::Timeframe;

/// Subgraph endpoint and query-shaping configuration.
///
/// The exchange subgraph serves pool, position, and transaction data;
/// the blocks subgraph maps timestamps to block numbers. Page sizes
/// bound the number of aliased entities per request to stay under the
/// indexer's result-size limit.
#[derive(Debug, Deserialize, Clone)]
pub struct SubgraphSettings {
    pub exchange_url: String,
    pub blocks_url: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_block_page_size")]
    pub block_page_size: usize,
    #[serde(default = "default_share_value_page_size")]
    pub share_value_page_size: usize,
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_block_page_size() -> usize {
    500
}

fn default_share_value_page_size() -> usize {
    50
}

/// Per-account store configuration.
///
/// Every derived slot (transactions, snapshots, positions, pair return
/// series, liquidity history) lives under the same TTL, so stale
/// reference-price-dependent computations age out instead of being
/// served forever.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_accounts")]
    pub max_accounts: u64,
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_max_accounts() -> u64 {
    10_000
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            max_accounts: default_max_accounts(),
        }
    }
}

/// Derived-series windowing configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    /// History window for the daily liquidity chart.
    #[serde(default)]
    pub timeframe: Timeframe,
    /// Trailing window for pair share-value series (days sampled daily).
    #[serde(default = "default_share_value_window_days")]
    pub share_value_window_days: u64,
}

fn default_share_value_window_days() -> u64 {
    7
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::default(),
            share_value_window_days: default_share_value_window_days(),
        }
    }
}

/// Daemon refresh configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct DaemonSettings {
    /// Accounts whose analytics the daemon keeps warm.
    #[serde(default)]
    pub watch_accounts: Vec<String>,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_interval_secs() -> u64 {
    120
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            watch_accounts: Vec::new(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

/// Root application configuration.
///
/// Loaded from `config.yaml` at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub subgraph: SubgraphSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub daemon: DaemonSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config"))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }
}
