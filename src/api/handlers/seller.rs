// Seller level handlers - JWT authenticated read of the caller's own level

use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use tracing::info;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::auth::{extract_jwt_from_header, validate_jwt_and_extract_user_id};
use crate::domain;
use crate::models::{LevelTableResponse, SellerLevelResponse};

/// Current level, progress and verification status of the authenticated seller
#[tracing::instrument(skip(state, headers), fields(seller_id = tracing::field::Empty))]
pub async fn seller_level_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SellerLevelResponse>> {
    // 1. Authenticate
    let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
    let token = extract_jwt_from_header(auth_header)?;
    let seller_id = validate_jwt_and_extract_user_id(token, &state.auth)?;
    tracing::Span::current().record("seller_id", seller_id.as_str());

    // 2. Compute from live counts
    let (report, effects) = domain::compute_seller_level(&state.levels, &seller_id, Utc::now()).await?;

    // 3. Persistence and notifications finish after the response is sent
    info!(pending_effects = effects.len(), "Returning seller level");
    effects.detach();

    Ok(Json(report.to_response()))
}

/// Level thresholds and verification criteria, for display on public pages
pub async fn level_table_handler(State(state): State<AppState>) -> Json<LevelTableResponse> {
    let config = &state.levels.config;
    Json(LevelTableResponse {
        levels: config.levels.clone(),
        verification_criteria: config.verification,
    })
}
