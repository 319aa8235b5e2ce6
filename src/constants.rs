/// Application constants

// Indexer (Blockfrost-compatible)
pub const DEFAULT_INDEXER_BASE_URL: &str = "https://cardano-mainnet.blockfrost.io/api/v0";
pub const INDEXER_CREDENTIAL_HEADER: &str = "project_id";

// Images
pub const DEFAULT_GATEWAY_BASE: &str = "https://gateway.pinata.cloud/ipfs/";
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://placehold.co/50x50?text=No+Image";
pub const IPFS_SCHEME_PREFIX: &str = "ipfs://";

// HTTP client
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 12;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 4;

// Cardano asset units: 28-byte policy id, hex encoded
pub const POLICY_ID_HEX_LEN: usize = 56;
pub const MAX_ASSET_NAME_HEX_LEN: usize = 64;

// API version
pub const API_VERSION: &str = "v1";
