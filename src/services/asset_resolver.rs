use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::{
    error::{AppError, Result},
    models::{AssetMetadata, BalanceEntry, DroppedAsset, Resolution, ResolvedAsset},
    services::image_uri::ImageUriNormalizer,
};

// ==================== CLIENT TRAITS ====================

#[async_trait::async_trait]
pub trait BalanceClient: Send + Sync {
    async fn fetch_balances(&self, address: &str) -> Result<Vec<BalanceEntry>>;
}

#[async_trait::async_trait]
pub trait MetadataClient: Send + Sync {
    async fn fetch_metadata(&self, asset_id: &str) -> Result<AssetMetadata>;
}

// ==================== RESOLVER ====================

// Native coin and metadata-less units answer 404 on every resolution.
fn is_routine_drop(err: &AppError) -> bool {
    matches!(err, AppError::NotFound(_))
}

#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Drop assets whose metadata carries no image reference.
    pub require_image: bool,
    /// Cap on concurrent metadata lookups; `None` fans out to every entry at once.
    pub max_in_flight: Option<usize>,
}

pub struct AssetResolver {
    balances: Arc<dyn BalanceClient>,
    metadata: Arc<dyn MetadataClient>,
    normalizer: ImageUriNormalizer,
    require_image: bool,
    limiter: Option<Semaphore>,
}

impl AssetResolver {
    pub fn new(
        balances: Arc<dyn BalanceClient>,
        metadata: Arc<dyn MetadataClient>,
        normalizer: ImageUriNormalizer,
        options: ResolverOptions,
    ) -> Self {
        let limiter = options
            .max_in_flight
            .filter(|limit| *limit > 0)
            .map(Semaphore::new);

        Self {
            balances,
            metadata,
            normalizer,
            require_image: options.require_image,
            limiter,
        }
    }

    pub fn normalizer(&self) -> &ImageUriNormalizer {
        &self.normalizer
    }

    /// Resolve a wallet address to its displayable assets.
    ///
    /// Never fails: an unknown wallet, a transport error or a failed metadata
    /// lookup shrinks the list instead. Output order follows the indexer's
    /// balance order.
    pub async fn resolve(&self, address: &str) -> Vec<ResolvedAsset> {
        self.resolve_with_report(address).await.assets
    }

    /// Same pipeline as [`resolve`](Self::resolve), also reporting what was dropped.
    pub async fn resolve_with_report(&self, address: &str) -> Resolution {
        let address = address.trim();
        let mut resolution = Resolution::empty(address);
        if address.is_empty() {
            return resolution;
        }

        let entries = match self.balances.fetch_balances(address).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Balance lookup failed for {}: {}", address, e);
                resolution.balance_error = Some(e.to_string());
                return resolution;
            }
        };

        if entries.is_empty() {
            tracing::info!("asset_resolution address={} entries=0", address);
            return resolution;
        }

        let lookups = entries.iter().map(|entry| self.resolve_entry(entry));
        let outcomes = futures_util::future::join_all(lookups).await;

        for (entry, outcome) in entries.iter().zip(outcomes) {
            match outcome {
                Ok(asset) => resolution.assets.push(asset),
                Err(e) => {
                    if is_routine_drop(&e) {
                        tracing::debug!("Dropping asset {} for {}: {}", entry.asset_id, address, e);
                    } else {
                        tracing::warn!("Dropping asset {} for {}: {}", entry.asset_id, address, e);
                    }
                    resolution
                        .dropped
                        .push(DroppedAsset::from_error(&entry.asset_id, &e));
                }
            }
        }

        tracing::info!(
            "asset_resolution address={} entries={} resolved={} dropped={}",
            address,
            entries.len(),
            resolution.assets.len(),
            resolution.dropped.len()
        );

        resolution
    }

    async fn resolve_entry(&self, entry: &BalanceEntry) -> Result<ResolvedAsset> {
        let _permit = match &self.limiter {
            Some(limiter) => Some(limiter.acquire().await.map_err(|e| {
                AppError::Internal(format!("Metadata limiter closed: {}", e))
            })?),
            None => None,
        };

        let metadata = self.metadata.fetch_metadata(&entry.asset_id).await?;
        if self.require_image && metadata.image.is_none() {
            return Err(AppError::NotFound(format!(
                "asset {} has no image reference",
                entry.asset_id
            )));
        }

        let image_url = self.normalizer.normalize(metadata.image.as_ref());
        Ok(ResolvedAsset::assemble(entry, metadata, image_url))
    }
}
