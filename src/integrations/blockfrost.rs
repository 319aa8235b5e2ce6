use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::{
    config::Config,
    constants::INDEXER_CREDENTIAL_HEADER,
    error::{AppError, Result},
    models::{AssetMetadata, BalanceEntry},
    services::asset_resolver::{BalanceClient, MetadataClient},
};

/// HTTP client for a Blockfrost-compatible Cardano indexer.
#[derive(Clone, Debug)]
pub struct BlockfrostClient {
    base_url: Url,
    project_id: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct AddressResponse {
    amount: Vec<BalanceEntry>,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    #[serde(default)]
    onchain_metadata: Option<Value>,
}

impl BlockfrostClient {
    pub fn new(
        base_url: &str,
        project_id: String,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Internal(format!("Invalid indexer URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Internal(format!(
                "Indexer URL cannot carry a path: {}",
                base_url
            )));
        }

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Indexer HTTP client init failed: {}", e)))?;

        Ok(Self {
            base_url,
            project_id,
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.indexer_base_url,
            config.indexer_project_id.trim().to_string(),
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    // Builds `{base}/{collection}/{id}` with `id` as one escaped segment.
    fn endpoint(&self, collection: &str, id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Indexer URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(collection)
            .push(id);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, label: &str) -> Result<T> {
        tracing::debug!(
            "Indexer request {} {} (project_id_set={})",
            label,
            url,
            !self.project_id.is_empty()
        );

        let response = self
            .client
            .get(url)
            .header(INDEXER_CREDENTIAL_HEADER, self.project_id.as_str())
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("{} request failed: {}", label, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_indexer_error_message(&body);
            if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Indexer {} returned {}: {}", label, status, detail);
            }
            return Err(AppError::NotFound(format!(
                "{} returned {}: {}",
                label,
                status.as_u16(),
                detail
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Transport(format!("{} body read failed: {}", label, e)))?;
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Malformed(format!("{} parse failed: {}", label, e)))
    }
}

#[async_trait::async_trait]
impl BalanceClient for BlockfrostClient {
    async fn fetch_balances(&self, address: &str) -> Result<Vec<BalanceEntry>> {
        let url = self.endpoint("addresses", address)?;
        let response: AddressResponse = self.get_json(url, "address lookup").await?;
        Ok(response.amount)
    }
}

#[async_trait::async_trait]
impl MetadataClient for BlockfrostClient {
    async fn fetch_metadata(&self, asset_id: &str) -> Result<AssetMetadata> {
        let url = self.endpoint("assets", asset_id)?;
        let response: AssetResponse = self.get_json(url, "asset lookup").await?;
        match response.onchain_metadata {
            None | Some(Value::Null) => Err(AppError::NotFound(format!(
                "asset {} has no on-chain metadata",
                asset_id
            ))),
            Some(payload @ Value::Object(_)) => serde_json::from_value(payload).map_err(|e| {
                AppError::Malformed(format!("asset {} metadata parse failed: {}", asset_id, e))
            }),
            Some(other) => Err(AppError::Malformed(format!(
                "asset {} metadata is not an object: {}",
                asset_id,
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// Internal helper that supports `extract_indexer_error_message` operations.
fn extract_indexer_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|payload| {
            payload
                .get("message")
                .or_else(|| payload.get("error"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| trimmed.chars().take(200).collect())
}
