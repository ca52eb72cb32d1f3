use axum::extract::State;

use crate::api::error::ApiResult;
use crate::api::state::AppState;

pub async fn health_handler() -> &'static str {
    "OK"
}

/// Readiness probe that round-trips to the database
#[tracing::instrument(skip(state))]
pub async fn db_health_handler(State(state): State<AppState>) -> ApiResult<&'static str> {
    state.levels.store.ping().await?;
    Ok("OK")
}
