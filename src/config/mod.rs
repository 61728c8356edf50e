mod config;

pub use config::{
    CacheSettings, DaemonSettings, HistorySettings, Settings, SubgraphSettings,
};
