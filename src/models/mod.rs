// src/models/mod.rs
pub mod asset;
pub mod response;

pub use asset::{
    AssetMetadata, BalanceEntry, DroppedAsset, ImageRef, Resolution, ResolvedAsset,
};
pub use response::ApiResponse;
