use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use url::Url;

use crate::config::SubgraphSettings;

/// GraphQL client for the exchange and blocks subgraphs.
///
/// Speaks the plain POST envelope (`{query, variables}` in,
/// `{data, errors}` out). One shared HTTP client carries the only
/// network-level timeout in the system; there are no automatic retries,
/// a failed query surfaces to the caller and the next access retries.
#[derive(Clone)]
pub struct SubgraphClient {
    http: Client,
    exchange_url: Url,
    blocks_url: Url,
}

#[derive(Serialize)]
struct GraphRequest<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphError>,
}

#[derive(Deserialize)]
struct GraphError {
    message: String,
}

impl SubgraphClient {
    pub fn new(settings: &SubgraphSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.http_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let exchange_url = settings
            .exchange_url
            .parse()
            .context("Invalid exchange subgraph URL")?;
        let blocks_url = settings
            .blocks_url
            .parse()
            .context("Invalid blocks subgraph URL")?;

        Ok(Self {
            http,
            exchange_url,
            blocks_url,
        })
    }

    async fn query<T, V>(&self, url: &Url, query: &str, variables: V) -> Result<T>
    where
        T: DeserializeOwned,
        V: Serialize,
    {
        let body = GraphRequest { query, variables };

        let response = self
            .http
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .context("Subgraph request failed")?
            .error_for_status()
            .context("Subgraph returned an error status")?;

        let envelope: GraphResponse<T> = response
            .json()
            .await
            .context("Failed to decode subgraph response")?;

        if let Some(error) = envelope.errors.first() {
            return Err(anyhow!("Subgraph query error: {}", error.message));
        }

        envelope
            .data
            .ok_or_else(|| anyhow!("Subgraph response missing data"))
    }

    /// Typed query against the exchange subgraph.
    pub async fn exchange_query<T, V>(&self, query: &str, variables: V) -> Result<T>
    where
        T: DeserializeOwned,
        V: Serialize,
    {
        self.query(&self.exchange_url, query, variables).await
    }

    /// Alias-keyed document against the exchange subgraph.
    ///
    /// Used for dynamically built documents (historical state at many
    /// blocks) where the response keys are caller-chosen aliases.
    pub async fn exchange_query_raw(&self, query: &str) -> Result<Map<String, Value>> {
        self.query(&self.exchange_url, query, Value::Null).await
    }

    /// Alias-keyed document against the blocks subgraph.
    pub async fn blocks_query_raw(&self, query: &str) -> Result<Map<String, Value>> {
        self.query(&self.blocks_url, query, Value::Null).await
    }
}
