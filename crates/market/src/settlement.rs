//! Purchase settlement.
//!
//! A purchase moves units from a listing to the buyer, charges the buyer,
//! records the purchase and notifies both sides, all in one transaction.
//! Concurrent buyers are separated by the conditional unit transfer: only
//! rows still listed move, and a short count aborts the whole purchase with
//! the retryable `CardAlreadySold`.

use photomarket_core::error::CoreError;
use photomarket_core::notification::{self, NotificationCategory};
use photomarket_core::pagination::{PageRequest, DEFAULT_PAGE_SIZE};
use photomarket_core::points;
use photomarket_core::types::DbId;
use photomarket_db::models::purchase::{CreatePurchase, PurchaseView};
use photomarket_db::repositories::{
    ListingRepo, NotificationRepo, PhotocardRepo, PointRepo, PurchaseRepo, UnitRepo, UserRepo,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::MarketResult;
use crate::ledger;
use crate::page::Page;

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub listing_id: DbId,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct PurchaseReceipt {
    pub purchase_id: DbId,
    pub listing_id: DbId,
    pub count: i64,
    pub total_price: i64,
    pub remaining_balance: i64,
    pub unit_ids: Vec<DbId>,
}

/// Buy `count` units from a listing.
pub async fn purchase(
    pool: &PgPool,
    buyer_id: DbId,
    request: &PurchaseRequest,
) -> MarketResult<PurchaseReceipt> {
    let PurchaseRequest { listing_id, count } = *request;
    if count < 1 {
        return Err(CoreError::InvalidData("Purchase count must be at least 1".into()).into());
    }
    let unit_count = i32::try_from(count)
        .map_err(|_| CoreError::InvalidData("Purchase count is too large".into()))?;

    let mut tx = pool.begin().await?;

    let listing = ListingRepo::lock_by_id(&mut *tx, listing_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        })?;
    if listing.seller_id == buyer_id {
        return Err(CoreError::Conflict("Cannot buy from your own listing".into()).into());
    }

    let available = UnitRepo::count_listed(&mut *tx, listing_id).await?;
    if count > available {
        return Err(CoreError::InvalidData(format!(
            "Requested {count} units but only {available} are available"
        ))
        .into());
    }

    let total_price = points::total_price(listing.price, count)?;
    let balance = PointRepo::find_by_user(&mut *tx, buyer_id)
        .await?
        .map_or(0, |l| l.balance);
    if balance < total_price {
        return Err(CoreError::InsufficientPoints(format!(
            "Balance {balance} does not cover {total_price} points"
        ))
        .into());
    }

    let unit_ids = UnitRepo::find_listed_ids(&mut *tx, listing_id, count, false).await?;
    let moved = UnitRepo::transfer_listed(&mut *tx, &unit_ids, listing_id, buyer_id).await?;
    if unit_ids.len() as i64 != count || moved != count as u64 {
        tracing::warn!(
            user_id = buyer_id,
            listing_id,
            count,
            moved,
            "Purchase lost a race for listed units",
        );
        return Err(CoreError::CardAlreadySold(
            "Some of the requested cards were just sold; please try again".into(),
        )
        .into());
    }

    ListingRepo::record_sold(&mut *tx, listing_id, unit_count).await?;

    let ledger = ledger::deduct(&mut tx, buyer_id, total_price).await?;

    let history = PurchaseRepo::create(
        &mut *tx,
        &CreatePurchase {
            purchaser_id: buyer_id,
            photocard_id: listing.photocard_id,
            listing_id,
            unit_count,
            total_price,
        },
    )
    .await?;

    let card = PhotocardRepo::find_by_id(&mut *tx, listing.photocard_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Photocard",
            id: listing.photocard_id,
        })?;
    let buyer = UserRepo::find_by_id(&mut *tx, buyer_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: buyer_id,
        })?;

    NotificationRepo::create(
        &mut *tx,
        buyer_id,
        NotificationCategory::Purchased,
        &notification::purchased_message(&card.name, count),
    )
    .await?;
    NotificationRepo::create(
        &mut *tx,
        card.creator_id,
        NotificationCategory::Sold,
        &notification::sold_message(&buyer.nickname, &card.name, count),
    )
    .await?;
    if UnitRepo::count_listed(&mut *tx, listing_id).await? == 0 {
        NotificationRepo::create(
            &mut *tx,
            card.creator_id,
            NotificationCategory::SoldOut,
            &notification::sold_out_message(&card.name),
        )
        .await?;
    }

    tx.commit().await?;

    tracing::info!(
        user_id = buyer_id,
        listing_id,
        purchase_id = history.id,
        count,
        total_price,
        "Purchase settled",
    );
    Ok(PurchaseReceipt {
        purchase_id: history.id,
        listing_id,
        count,
        total_price,
        remaining_balance: ledger.balance,
        unit_ids,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// The buyer's purchases, newest first.
pub async fn get_history(
    pool: &PgPool,
    buyer_id: DbId,
    query: &HistoryQuery,
) -> MarketResult<Page<PurchaseView>> {
    let request = PageRequest::new(query.page, query.page_size, DEFAULT_PAGE_SIZE)?;
    let (items, total) =
        PurchaseRepo::list_for_user(pool, buyer_id, request.page_size, request.offset()).await?;
    Ok(Page::new(items, request, total))
}
