//! Point ledger model.

use photomarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `point_ledgers` table. One per user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PointLedger {
    pub user_id: DbId,
    pub balance: i64,
    pub last_grant_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
