//! Handlers for the `/cards` resource: issuance and the owner's gallery.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use photomarket_core::types::DbId;
use photomarket_db::models::card::{GalleryCard, Photocard};
use photomarket_market::cards::{self, GalleryQuery, NewCard};
use photomarket_market::page::GradedPage;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/cards
///
/// Issue a new card type. Every issued unit starts in the creator's gallery.
pub async fn create_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<NewCard>,
) -> AppResult<(StatusCode, Json<DataResponse<Photocard>>)> {
    let photocard = cards::create_card(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(photocard))))
}

/// GET /api/v1/cards/me
pub async fn my_gallery(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<GalleryQuery>,
) -> AppResult<Json<DataResponse<GradedPage<GalleryCard>>>> {
    let page = cards::get_gallery(&state.pool, auth.user_id, &params).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/cards/{card_id}
pub async fn my_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(card_id): Path<DbId>,
) -> AppResult<Json<DataResponse<GalleryCard>>> {
    let card = cards::get_owned_card(&state.pool, auth.user_id, card_id).await?;
    Ok(Json(DataResponse::new(card)))
}
