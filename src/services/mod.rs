// All service modules
pub mod asset_resolver;
pub mod image_uri;

// Re-export for convenience
pub use asset_resolver::{AssetResolver, ResolverOptions};
pub use image_uri::ImageUriNormalizer;

use std::sync::Arc;

use crate::{config::Config, error::Result, integrations::BlockfrostClient};

/// Wire the resolver against the configured indexer and gateway.
pub fn build_asset_resolver(config: &Config) -> Result<AssetResolver> {
    let indexer = Arc::new(BlockfrostClient::from_config(config)?);
    let normalizer = ImageUriNormalizer::new(
        config.gateway_base.clone(),
        config.placeholder_url.clone(),
    );
    let options = ResolverOptions {
        require_image: config.require_image,
        max_in_flight: config.effective_max_in_flight(),
    };

    tracing::info!(
        "Asset resolver ready: indexer={} gateway={} require_image={} max_in_flight={:?}",
        indexer.base_url(),
        normalizer.gateway_base(),
        options.require_image,
        options.max_in_flight
    );

    Ok(AssetResolver::new(
        indexer.clone(),
        indexer,
        normalizer,
        options,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_asset_resolver_uses_config_values() {
        let mut config = Config::for_tests("https://cardano-preprod.blockfrost.io/api/v0");
        config.gateway_base = "https://ipfs.io/ipfs".to_string();
        let resolver = build_asset_resolver(&config).expect("resolver should build");
        assert_eq!(resolver.normalizer().gateway_base(), "https://ipfs.io/ipfs/");
    }

    #[test]
    fn build_asset_resolver_rejects_bad_indexer_url() {
        let config = Config::for_tests("::nope::");
        assert!(build_asset_resolver(&config).is_err());
    }
}
