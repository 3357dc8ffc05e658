//! Route definitions for the `/users` resource. All require auth.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// ```text
/// GET  /me         -> me
/// GET  /points     -> points
/// POST /points     -> grant_points
/// GET  /purchases  -> purchases
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(user::me))
        .route("/points", get(user::points).post(user::grant_points))
        .route("/purchases", get(user::purchases))
}
