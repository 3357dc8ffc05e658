//! Photocard definitions and the units users own.

use photomarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `photocards` table: the definition shared by every unit.
///
/// `grade` and `genre` hold the `SCREAMING_SNAKE_CASE` spelling of
/// [`photomarket_core::card::Grade`] and [`photomarket_core::card::Genre`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Photocard {
    pub id: DbId,
    pub creator_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub grade: String,
    pub genre: String,
    pub price: i64,
    pub total_issued: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreatePhotocard {
    pub creator_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub grade: String,
    pub genre: String,
    pub price: i64,
    pub total_issued: i32,
}

/// A row from the `user_photocards` table: one owned unit.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserPhotocard {
    pub id: DbId,
    pub photocard_id: DbId,
    pub owner_id: DbId,
    pub is_listed: bool,
    pub listing_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A card definition seen from one owner's gallery, with unit counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GalleryCard {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub grade: String,
    pub genre: String,
    pub price: i64,
    pub total_issued: i32,
    pub creator_nickname: String,
    pub owned_count: i64,
    pub listed_count: i64,
}

/// Filters shared by the gallery and "my listings" views.
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    pub grade: Option<String>,
    pub genre: Option<String>,
    pub keyword: Option<String>,
}

/// Number of items per grade in a filtered view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GradeCount {
    pub grade: String,
    pub count: i64,
}
