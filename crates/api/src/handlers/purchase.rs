//! Handler for `POST /market/purchase`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use photomarket_market::settlement::{self, PurchaseReceipt, PurchaseRequest};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/market/purchase
///
/// A `409 ALREADY_SOLD` means another buyer won the race; the request can be
/// retried as-is.
pub async fn purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<PurchaseRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PurchaseReceipt>>)> {
    let receipt = settlement::purchase(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(receipt))))
}
