use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = photomarket_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
