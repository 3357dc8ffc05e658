//! Listing entity model, DTOs, and market read models.

use photomarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub photocard_id: DbId,
    pub seller_id: DbId,
    pub price: i64,
    pub total_count: i32,
    /// Units that left the listing by purchase or trade.
    pub sold_count: i32,
    pub trade_grade: String,
    pub trade_genre: String,
    pub trade_note: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateListing {
    pub photocard_id: DbId,
    pub seller_id: DbId,
    pub price: i64,
    pub total_count: i32,
    pub trade_grade: String,
    pub trade_genre: String,
    pub trade_note: String,
}

/// Listing fields that can be patched without touching reservations.
#[derive(Debug, Default)]
pub struct UpdateListingFields {
    pub price: Option<i64>,
    pub trade_grade: Option<String>,
    pub trade_genre: Option<String>,
    pub trade_note: Option<String>,
}

/// A listing joined with its card and live unit counts.
///
/// `left_count` is the number of units still reserved; `sold_count` the
/// number that left the listing through purchase or trade.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingSummary {
    pub id: DbId,
    pub photocard_id: DbId,
    pub seller_id: DbId,
    pub seller_nickname: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub grade: String,
    pub genre: String,
    pub price: i64,
    pub total_count: i32,
    pub left_count: i64,
    pub sold_count: i64,
    pub trade_grade: String,
    pub trade_genre: String,
    pub trade_note: String,
    pub created_at: Timestamp,
}

/// Filters for the market feed and the seller's own listings.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub grade: Option<String>,
    pub genre: Option<String>,
    pub keyword: Option<String>,
    /// `true` keeps only listings with no units left, `false` only those
    /// with some left.
    pub sold_out: Option<bool>,
}

/// Position of the last row of the previous market page.
#[derive(Debug, Clone, Copy)]
pub struct ListingCursor {
    pub id: DbId,
    pub price: i64,
    pub created_at: Timestamp,
}

impl From<&Listing> for ListingCursor {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            price: listing.price,
            created_at: listing.created_at,
        }
    }
}
