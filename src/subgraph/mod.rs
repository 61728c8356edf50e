pub mod client;
pub mod ops;
pub mod paginate;
pub mod queries;

pub use client::SubgraphClient;
pub use paginate::{paged_skip_query, split_query};
