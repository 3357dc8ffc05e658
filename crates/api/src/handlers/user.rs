//! Handlers for the `/users` resource: profile, points and purchases.

use axum::extract::{Query, State};
use axum::Json;
use photomarket_core::error::CoreError;
use photomarket_db::models::purchase::PurchaseView;
use photomarket_db::models::user::UserResponse;
use photomarket_db::repositories::UserRepo;
use photomarket_market::ledger::{self, Grant, PointStatus};
use photomarket_market::page::Page;
use photomarket_market::settlement::{self, HistoryQuery};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub balance: i64,
}

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    let ledger = ledger::get_ledger(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse::new(MeResponse {
        user: UserResponse::from(&user),
        balance: ledger.balance,
    })))
}

/// GET /api/v1/users/points
pub async fn points(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<PointStatus>>> {
    let ledger = ledger::get_ledger(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(PointStatus::from(&ledger))))
}

/// POST /api/v1/users/points
///
/// Random grant of 1..=10 points, at most once per cooldown window.
pub async fn grant_points(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Grant>>> {
    let grant = ledger::grant_random(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(grant)))
}

/// GET /api/v1/users/purchases
pub async fn purchases(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Page<PurchaseView>>>> {
    let page = settlement::get_history(&state.pool, auth.user_id, &params).await?;
    Ok(Json(DataResponse::new(page)))
}
