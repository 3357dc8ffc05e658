//! Route definitions for `/market`: listings, trades and purchases.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{listing, purchase, trade};
use crate::state::AppState;

/// Routes mounted at `/market`.
///
/// ```text
/// GET    /listings                      -> market (public)
/// POST   /listings                      -> create_listing
/// GET    /listings/me                   -> my_listings
/// GET    /listings/{listing_id}         -> get_listing (public)
/// PATCH  /listings/cards/{card_id}      -> update_listing
/// DELETE /listings/cards/{card_id}      -> remove_listing
///
/// POST   /trades/listings/{listing_id}  -> propose
/// GET    /trades/me                     -> my_proposals
/// GET    /trades/cards/{card_id}        -> card_history
/// PATCH  /trades/{trade_id}/approve     -> approve
/// PATCH  /trades/{trade_id}/reject      -> reject
///
/// POST   /purchase                      -> purchase
/// ```
pub fn router() -> Router<AppState> {
    let listings = Router::new()
        .route("/", get(listing::market).post(listing::create_listing))
        .route("/me", get(listing::my_listings))
        .route("/{listing_id}", get(listing::get_listing))
        .route(
            "/cards/{card_id}",
            patch(listing::update_listing).delete(listing::remove_listing),
        );

    let trades = Router::new()
        .route("/listings/{listing_id}", post(trade::propose))
        .route("/me", get(trade::my_proposals))
        .route("/cards/{card_id}", get(trade::card_history))
        .route("/{trade_id}/approve", patch(trade::approve))
        .route("/{trade_id}/reject", patch(trade::reject));

    Router::new()
        .nest("/listings", listings)
        .nest("/trades", trades)
        .route("/purchase", post(purchase::purchase))
}
