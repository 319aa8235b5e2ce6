use axum::{
    extract::{Path, State},
    Json,
};

use super::AppState;
use crate::models::{ApiResponse, Resolution, ResolvedAsset};

/// GET /api/v1/wallets/{address}/assets
///
/// Always answers 200. Unknown wallets and failed lookups show up as fewer
/// (or zero) assets, never as an error status.
pub async fn get_wallet_assets(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Json<ApiResponse<Vec<ResolvedAsset>>> {
    let assets = state.resolver.resolve(&address).await;
    Json(ApiResponse::success(assets))
}

/// GET /api/v1/wallets/{address}/assets/report
pub async fn get_wallet_assets_report(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Json<ApiResponse<Resolution>> {
    let resolution = state.resolver.resolve_with_report(&address).await;
    Json(ApiResponse::success(resolution))
}
