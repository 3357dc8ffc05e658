pub mod auth;
pub mod card;
pub mod health;
pub mod market;
pub mod notification;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/...            signup, login, refresh, logout
/// /users/...           profile, points, purchase history
/// /cards/...           issuance, gallery
/// /market/listings/... market feed, seller listings
/// /market/trades/...   trade proposals
/// /market/purchase     settlement
/// /notifications/...   outbox reads
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/cards", card::router())
        .nest("/market", market::router())
        .nest("/notifications", notification::router())
}
