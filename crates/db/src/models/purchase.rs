//! Purchase history model.

use photomarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `purchase_histories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchaseHistory {
    pub id: DbId,
    pub purchaser_id: DbId,
    pub photocard_id: DbId,
    pub listing_id: Option<DbId>,
    pub unit_count: i32,
    pub total_price: i64,
    pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct CreatePurchase {
    pub purchaser_id: DbId,
    pub photocard_id: DbId,
    pub listing_id: DbId,
    pub unit_count: i32,
    pub total_price: i64,
}

/// A purchase joined with the card that was bought.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchaseView {
    pub id: DbId,
    pub photocard_id: DbId,
    pub listing_id: Option<DbId>,
    pub name: String,
    pub image_url: Option<String>,
    pub grade: String,
    pub genre: String,
    pub unit_count: i32,
    pub total_price: i64,
    pub created_at: Timestamp,
}
