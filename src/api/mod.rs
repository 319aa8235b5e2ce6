// src/api/mod.rs
pub mod assets;
pub mod health;

use std::sync::Arc;

use crate::config::Config;
use crate::services::AssetResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<AssetResolver>,
    pub config: Config,
}
