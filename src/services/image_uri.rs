use url::Url;

use crate::constants::IPFS_SCHEME_PREFIX;
use crate::models::ImageRef;

/// Turns on-chain image references into URLs a browser can load.
///
/// `ipfs://` references are rewritten onto the configured gateway. Plain
/// http(s) and `data:` URLs are passed through unchanged. Anything else, and
/// any result that does not parse as a URL, becomes the placeholder.
#[derive(Debug, Clone)]
pub struct ImageUriNormalizer {
    gateway_base: String,
    placeholder_url: String,
}

impl ImageUriNormalizer {
    pub fn new(gateway_base: impl Into<String>, placeholder_url: impl Into<String>) -> Self {
        let mut gateway_base = gateway_base.into();
        if !gateway_base.ends_with('/') {
            gateway_base.push('/');
        }
        Self {
            gateway_base,
            placeholder_url: placeholder_url.into(),
        }
    }

    pub fn gateway_base(&self) -> &str {
        &self.gateway_base
    }

    pub fn normalize(&self, image: Option<&ImageRef>) -> String {
        match image {
            None => self.placeholder(),
            // Only the first fragment carries the scheme marker.
            Some(ImageRef::Split(prefix, suffix)) => {
                let prefix = strip_ipfs_scheme(prefix).unwrap_or(prefix);
                self.checked(format!("{}{}{}", self.gateway_base, prefix, suffix))
            }
            Some(ImageRef::Plain(raw)) => match strip_ipfs_scheme(raw) {
                Some(path) => self.checked(format!("{}{}", self.gateway_base, path)),
                None if is_passthrough_url(raw) => raw.clone(),
                None => {
                    tracing::debug!("Unsupported image reference, using placeholder: {}", raw);
                    self.placeholder()
                }
            },
            Some(ImageRef::Unsupported(value)) => {
                tracing::debug!("Unsupported image reference shape: {}", value);
                self.placeholder()
            }
        }
    }

    fn placeholder(&self) -> String {
        self.placeholder_url.clone()
    }

    fn checked(&self, candidate: String) -> String {
        if Url::parse(&candidate).is_ok() {
            candidate
        } else {
            tracing::debug!("Gateway URL failed to parse, using placeholder: {}", candidate);
            self.placeholder()
        }
    }
}

fn strip_ipfs_scheme(raw: &str) -> Option<&str> {
    raw.strip_prefix(IPFS_SCHEME_PREFIX)
}

fn is_passthrough_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "data"),
        Err(_) => false,
    }
}
