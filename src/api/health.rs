use axum::{extract::State, Json};
use serde::Serialize;
use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub indexer_base_url: String,
    pub gateway_base: String,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // No indexer round trip here; each lookup would spend the caller's quota.
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        indexer_base_url: state.config.indexer_base_url.clone(),
        gateway_base: state.resolver.normalizer().gateway_base().to_string(),
    })
}
