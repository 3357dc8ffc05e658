//! Trade proposal model and DTOs.

use photomarket_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `trade_proposals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TradeProposal {
    pub id: DbId,
    pub requester_id: DbId,
    pub offered_unit_id: DbId,
    pub target_unit_id: DbId,
    pub content: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateTradeProposal {
    pub requester_id: DbId,
    pub offered_unit_id: DbId,
    pub target_unit_id: DbId,
    pub content: String,
}

/// A proposal joined with the offered card, as shown in trade histories.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TradeProposalView {
    pub id: DbId,
    pub requester_id: DbId,
    pub requester_nickname: String,
    pub offered_unit_id: DbId,
    pub target_unit_id: DbId,
    pub offered_card_id: DbId,
    pub offered_card_name: String,
    pub offered_card_grade: String,
    pub offered_card_genre: String,
    pub target_card_id: DbId,
    pub target_card_name: String,
    pub content: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
