//! Handlers for `/market/trades`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use photomarket_core::types::DbId;
use photomarket_db::models::trade::{TradeProposal, TradeProposalView};
use photomarket_market::trades::{self, NewProposal};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/market/trades/listings/{listing_id}
///
/// Offer one of the caller's unlisted units for a unit of the listing.
pub async fn propose(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(listing_id): Path<DbId>,
    Json(input): Json<NewProposal>,
) -> AppResult<(StatusCode, Json<DataResponse<TradeProposal>>)> {
    let proposal = trades::propose(&state.pool, auth.user_id, listing_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(proposal))))
}

/// PATCH /api/v1/market/trades/{trade_id}/approve
pub async fn approve(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(trade_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TradeProposal>>> {
    let proposal = trades::approve(&state.pool, auth.user_id, trade_id).await?;
    Ok(Json(DataResponse::new(proposal)))
}

/// PATCH /api/v1/market/trades/{trade_id}/reject
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(trade_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TradeProposal>>> {
    let proposal = trades::reject(&state.pool, auth.user_id, trade_id).await?;
    Ok(Json(DataResponse::new(proposal)))
}

/// GET /api/v1/market/trades/cards/{card_id}
///
/// Proposals received for a card type. Creator only.
pub async fn card_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(card_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TradeProposalView>>>> {
    let history = trades::get_history(&state.pool, auth.user_id, card_id).await?;
    Ok(Json(DataResponse::new(history)))
}

/// GET /api/v1/market/trades/me
pub async fn my_proposals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<TradeProposalView>>>> {
    let proposals = trades::get_my_proposals(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(proposals)))
}
