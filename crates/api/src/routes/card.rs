use axum::routing::{get, post};
use axum::Router;

use crate::handlers::card;
use crate::state::AppState;

/// Routes mounted at `/cards`.
///
/// ```text
/// POST /            -> create_card
/// GET  /me          -> my_gallery
/// GET  /{card_id}   -> my_card
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(card::create_card))
        .route("/me", get(card::my_gallery))
        .route("/{card_id}", get(card::my_card))
}
