//! Trade proposal lifecycle.
//!
//! A proposal offers one of the requester's unlisted units for a unit still
//! listed under someone else's listing. Approval swaps the two owners;
//! rejection only records the outcome. Both are terminal.

use photomarket_core::error::CoreError;
use photomarket_core::notification::{self, NotificationCategory};
use photomarket_core::trade::{self, TradeStatus};
use photomarket_core::types::DbId;
use photomarket_db::models::card::{Photocard, UserPhotocard};
use photomarket_db::models::trade::{CreateTradeProposal, TradeProposal, TradeProposalView};
use photomarket_db::repositories::{
    ListingRepo, NotificationRepo, PhotocardRepo, TradeRepo, UnitRepo, UserRepo,
};
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};

use crate::error::{is_unique_violation, MarketResult};

const PENDING_PAIR: &str = "uq_trade_proposals_pending_pair";

#[derive(Debug, Deserialize)]
pub struct NewProposal {
    pub offered_unit_id: DbId,
    pub content: Option<String>,
}

async fn load_trade(conn: &mut PgConnection, trade_id: DbId) -> MarketResult<TradeProposal> {
    TradeRepo::find_by_id(&mut *conn, trade_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "TradeProposal",
                id: trade_id,
            }
            .into()
        })
}

async fn load_unit(conn: &mut PgConnection, unit_id: DbId) -> MarketResult<UserPhotocard> {
    UnitRepo::find_by_id(&mut *conn, unit_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "UserPhotocard",
                id: unit_id,
            }
            .into()
        })
}

async fn load_card(conn: &mut PgConnection, photocard_id: DbId) -> MarketResult<Photocard> {
    PhotocardRepo::find_by_id(&mut *conn, photocard_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Photocard",
                id: photocard_id,
            }
            .into()
        })
}

/// Check that `status -> next` is legal and that `user_id` holds the
/// target unit. Returns the target unit.
async fn authorize_decision(
    conn: &mut PgConnection,
    proposal: &TradeProposal,
    user_id: DbId,
    next: TradeStatus,
) -> MarketResult<UserPhotocard> {
    let status: TradeStatus = proposal.status.parse()?;
    status.ensure_transition(next)?;

    let target = load_unit(conn, proposal.target_unit_id).await?;
    if target.owner_id != user_id {
        return Err(CoreError::Forbidden(
            "Only the owner of the requested card can decide on this trade".into(),
        )
        .into());
    }
    Ok(target)
}

/// Offer one of the requester's units for the next unit of a listing.
pub async fn propose(
    pool: &PgPool,
    requester_id: DbId,
    listing_id: DbId,
    input: &NewProposal,
) -> MarketResult<TradeProposal> {
    let content = input.content.clone().unwrap_or_default();
    trade::validate_content(&content)?;

    let mut tx = pool.begin().await?;

    let listing = ListingRepo::find_by_id(&mut *tx, listing_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        })?;
    if listing.seller_id == requester_id {
        return Err(
            CoreError::Forbidden("Cannot propose a trade on your own listing".into()).into(),
        );
    }
    let target = UnitRepo::first_listed(&mut *tx, listing_id)
        .await?
        .ok_or_else(|| {
            CoreError::CardUnavailable(format!("Listing {listing_id} has no units left"))
        })?;

    let offered = load_unit(&mut tx, input.offered_unit_id).await?;
    if offered.owner_id != requester_id {
        return Err(CoreError::Forbidden("You do not own the offered card".into()).into());
    }
    if offered.is_listed {
        return Err(CoreError::AlreadyInTrade("The offered card is listed for sale".into()).into());
    }
    if TradeRepo::pending_exists(&mut *tx, offered.id, target.id).await? {
        return Err(CoreError::AlreadyInTrade("This trade is already pending".into()).into());
    }

    let created = TradeRepo::create(
        &mut *tx,
        &CreateTradeProposal {
            requester_id,
            offered_unit_id: offered.id,
            target_unit_id: target.id,
            content,
        },
    )
    .await;
    let proposal = match created {
        Ok(proposal) => proposal,
        Err(e) if is_unique_violation(&e, PENDING_PAIR) => {
            return Err(CoreError::AlreadyInTrade("This trade is already pending".into()).into());
        }
        Err(e) => return Err(e.into()),
    };

    let card = load_card(&mut tx, listing.photocard_id).await?;
    let requester = UserRepo::find_by_id(&mut *tx, requester_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: requester_id,
        })?;
    NotificationRepo::create(
        &mut *tx,
        card.creator_id,
        NotificationCategory::TradeOffered,
        &notification::trade_offered_message(&requester.nickname, &card.name),
    )
    .await?;

    tx.commit().await?;
    tracing::info!(
        user_id = requester_id,
        trade_id = proposal.id,
        listing_id,
        offered_unit_id = offered.id,
        target_unit_id = target.id,
        "Trade proposed",
    );
    Ok(proposal)
}

/// Complete a pending trade: the two units swap owners.
pub async fn approve(
    pool: &PgPool,
    approver_id: DbId,
    trade_id: DbId,
) -> MarketResult<TradeProposal> {
    let mut tx = pool.begin().await?;

    let proposal = load_trade(&mut tx, trade_id).await?;
    let target = authorize_decision(&mut tx, &proposal, approver_id, TradeStatus::Completed).await?;

    if !TradeRepo::transition(&mut *tx, trade_id, TradeStatus::Pending, TradeStatus::Completed)
        .await?
    {
        return Err(CoreError::InvalidTradeStatus("Trade was already decided".into()).into());
    }

    let off_sale = || CoreError::CardUnavailable("The requested card is no longer on sale".into());
    let listing_id = target.listing_id.ok_or_else(off_sale)?;
    ListingRepo::lock_by_id(&mut *tx, listing_id)
        .await?
        .ok_or_else(off_sale)?;
    if !UnitRepo::take_listed(
        &mut *tx,
        target.id,
        listing_id,
        approver_id,
        proposal.requester_id,
    )
    .await?
    {
        return Err(off_sale().into());
    }
    ListingRepo::record_sold(&mut *tx, listing_id, 1).await?;
    if !UnitRepo::transfer_unlisted(
        &mut *tx,
        proposal.offered_unit_id,
        proposal.requester_id,
        approver_id,
    )
    .await?
    {
        return Err(
            CoreError::CardUnavailable("The offered card is no longer available".into()).into(),
        );
    }

    let card = load_card(&mut tx, target.photocard_id).await?;
    let message = notification::trade_accepted_message(&card.name);
    for receiver in [proposal.requester_id, approver_id] {
        NotificationRepo::create(&mut *tx, receiver, NotificationCategory::TradeAccepted, &message)
            .await?;
    }

    let completed = load_trade(&mut tx, trade_id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = approver_id,
        trade_id,
        requester_id = proposal.requester_id,
        "Trade approved",
    );
    Ok(completed)
}

/// Decline a pending trade. No unit changes hands.
pub async fn reject(pool: &PgPool, owner_id: DbId, trade_id: DbId) -> MarketResult<TradeProposal> {
    let mut tx = pool.begin().await?;

    let proposal = load_trade(&mut tx, trade_id).await?;
    let target = authorize_decision(&mut tx, &proposal, owner_id, TradeStatus::Rejected).await?;

    if !TradeRepo::transition(&mut *tx, trade_id, TradeStatus::Pending, TradeStatus::Rejected)
        .await?
    {
        return Err(CoreError::InvalidTradeStatus("Trade was already decided".into()).into());
    }

    let card = load_card(&mut tx, target.photocard_id).await?;
    NotificationRepo::create(
        &mut *tx,
        proposal.requester_id,
        NotificationCategory::TradeRejected,
        &notification::trade_rejected_message(&card.name),
    )
    .await?;

    let rejected = load_trade(&mut tx, trade_id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = owner_id,
        trade_id,
        requester_id = proposal.requester_id,
        "Trade rejected",
    );
    Ok(rejected)
}

/// Every proposal made for units of a card type. Creator only.
pub async fn get_history(
    pool: &PgPool,
    user_id: DbId,
    photocard_id: DbId,
) -> MarketResult<Vec<TradeProposalView>> {
    let mut conn = pool.acquire().await?;
    let card = load_card(&mut conn, photocard_id).await?;
    if card.creator_id != user_id {
        return Err(
            CoreError::Forbidden("Only the card's creator can view its trades".into()).into(),
        );
    }

    let history = TradeRepo::list_for_card(&mut *conn, photocard_id).await?;
    if history.is_empty() {
        return Err(CoreError::NotFound {
            entity: "Trade history for photocard",
            id: photocard_id,
        }
        .into());
    }
    Ok(history)
}

pub async fn get_my_proposals(
    pool: &PgPool,
    user_id: DbId,
) -> MarketResult<Vec<TradeProposalView>> {
    Ok(TradeRepo::list_for_requester(pool, user_id).await?)
}
