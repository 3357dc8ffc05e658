//! Handlers for `/market/listings`.
//!
//! Reads of the market feed and single listings are public; everything that
//! touches a seller's listings requires authentication.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use photomarket_core::types::DbId;
use photomarket_db::models::listing::ListingSummary;
use photomarket_market::listings::{
    self, ListingUpdate, MarketPage, MarketQuery, MyListingsQuery, NewListing,
};
use photomarket_market::page::GradedPage;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/market/listings
///
/// Cursor-paged market feed. Pass `next_cursor` back as `cursor`.
pub async fn market(
    State(state): State<AppState>,
    Query(params): Query<MarketQuery>,
) -> AppResult<Json<DataResponse<MarketPage>>> {
    let page = listings::get_market(&state.pool, &params).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/market/listings/{listing_id}
pub async fn get_listing(
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ListingSummary>>> {
    let listing = listings::get_listing(&state.pool, listing_id).await?;
    Ok(Json(DataResponse::new(listing)))
}

/// POST /api/v1/market/listings
pub async fn create_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<NewListing>,
) -> AppResult<(StatusCode, Json<DataResponse<ListingSummary>>)> {
    let listing = listings::create_listing(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(listing))))
}

/// GET /api/v1/market/listings/me
pub async fn my_listings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<MyListingsQuery>,
) -> AppResult<Json<DataResponse<GradedPage<ListingSummary>>>> {
    let page = listings::get_my_listings(&state.pool, auth.user_id, &params).await?;
    Ok(Json(DataResponse::new(page)))
}

/// PATCH /api/v1/market/listings/cards/{card_id}
pub async fn update_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(card_id): Path<DbId>,
    Json(input): Json<ListingUpdate>,
) -> AppResult<Json<DataResponse<ListingSummary>>> {
    let listing = listings::update_listing(&state.pool, auth.user_id, card_id, &input).await?;
    Ok(Json(DataResponse::new(listing)))
}

/// DELETE /api/v1/market/listings/cards/{card_id}
///
/// Withdraws the listing and returns its unsold units. 204 No Content.
pub async fn remove_listing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(card_id): Path<DbId>,
) -> AppResult<StatusCode> {
    listings::remove_listing(&state.pool, auth.user_id, card_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
