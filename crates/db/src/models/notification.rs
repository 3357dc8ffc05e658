//! Notification model.

use photomarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub receiver_id: DbId,
    pub category: String,
    pub message: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
