// src/query.rs
use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;
use crate::types::Coin;

/// The one query capability the fee estimator consumes: the chain's
/// current price-per-byte. `None` means the chain reported no price (the
/// estimator falls back to 1); transport errors propagate unchanged.
#[allow(async_fn_in_trait)]
pub trait FeePerByteQuery {
    async fn query_fee_per_byte(&self) -> Result<Option<Coin>>;
}

/// HTTP client for the chain's ISCN query endpoints.
#[derive(Debug, Clone)]
pub struct IscnQueryClient {
    base_url: String,
    client: Client,
}

impl IscnQueryClient {
    /// Create a new client
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            base_url: node_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a client with custom reqwest client
    pub fn with_client(node_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: node_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Fetch the chain's current storage price per byte.
    pub async fn query_fee_per_byte(&self) -> Result<Option<Coin>> {
        let url = format!("{}/iscn/params", self.base_url);
        let response: IscnParamsResponse = self.client.get(&url)
            .send()
            .await?
            .json()
            .await?;

        Ok(response.params.and_then(|params| params.fee_per_byte))
    }
}

impl FeePerByteQuery for IscnQueryClient {
    async fn query_fee_per_byte(&self) -> Result<Option<Coin>> {
        IscnQueryClient::query_fee_per_byte(self).await
    }
}

// Internal response types
#[derive(Deserialize)]
struct IscnParamsResponse {
    params: Option<IscnParams>,
}

#[derive(Deserialize)]
struct IscnParams {
    #[serde(rename = "feePerByte")]
    fee_per_byte: Option<Coin>,
}
