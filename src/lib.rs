pub mod blocks;
pub mod config;
pub mod metrics;
pub mod models;
pub mod service;
pub mod store;
pub mod subgraph;
pub mod utils;

pub use config::Settings;
pub use service::Analytics;
pub use store::AccountStore;
pub use subgraph::SubgraphClient;
