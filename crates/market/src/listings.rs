//! Listing lifecycle and the public market feed.
//!
//! A card type has at most one listing. Creating it reserves units from the
//! creator's unlisted stock; updating the total grows or shrinks that
//! reserved set; removing it releases whatever is still reserved.

use photomarket_core::card::{self, Genre, Grade};
use photomarket_core::error::CoreError;
use photomarket_core::listing::{self, MarketOrder, ReservationChange};
use photomarket_core::pagination::{
    self, PageRequest, DEFAULT_MARKET_TAKE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use photomarket_core::types::DbId;
use photomarket_db::models::card::Photocard;
use photomarket_db::models::listing::{
    CreateListing, Listing, ListingCursor, ListingFilter, ListingSummary, UpdateListingFields,
};
use photomarket_db::repositories::{ListingRepo, PhotocardRepo, UnitRepo};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::cards::card_filter;
use crate::error::{is_unique_violation, MarketResult};
use crate::page::{fill_grade_counts, GradedPage, Page};

#[derive(Debug, Deserialize)]
pub struct NewListing {
    pub photocard_id: DbId,
    pub total_count: i64,
    /// Defaults to the card type's price.
    pub price: Option<i64>,
    pub trade_grade: String,
    pub trade_genre: String,
    pub trade_note: Option<String>,
}

/// Partial update. Absent fields are left alone.
#[derive(Debug, Default, Deserialize)]
pub struct ListingUpdate {
    pub price: Option<i64>,
    /// New total including units already sold.
    pub total_count: Option<i64>,
    pub trade_grade: Option<String>,
    pub trade_genre: Option<String>,
    pub trade_note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketQuery {
    pub cursor: Option<DbId>,
    pub take: Option<i64>,
    pub grade: Option<String>,
    pub genre: Option<String>,
    pub keyword: Option<String>,
    pub is_sold_out: Option<bool>,
    pub order_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MyListingsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub grade: Option<String>,
    pub genre: Option<String>,
    pub keyword: Option<String>,
    pub is_sold_out: Option<bool>,
}

/// One slice of the market feed.
#[derive(Debug, Serialize)]
pub struct MarketPage {
    pub lists: Vec<ListingSummary>,
    /// Pass back as `cursor` to fetch the next slice.
    pub next_cursor: Option<DbId>,
    pub has_more: bool,
}

fn listing_filter(
    grade: Option<&str>,
    genre: Option<&str>,
    keyword: Option<&str>,
    sold_out: Option<bool>,
) -> Result<ListingFilter, CoreError> {
    let cards = card_filter(grade, genre, keyword)?;
    Ok(ListingFilter {
        grade: cards.grade,
        genre: cards.genre,
        keyword: cards.keyword,
        sold_out,
    })
}

fn to_i32(value: i64, field: &str) -> Result<i32, CoreError> {
    i32::try_from(value).map_err(|_| CoreError::Validation(format!("{field} is out of range")))
}

/// Load a card type and make sure `seller_id` created it.
async fn creator_card(
    conn: &mut PgConnection,
    seller_id: DbId,
    photocard_id: DbId,
) -> MarketResult<Photocard> {
    let photocard = PhotocardRepo::find_by_id(&mut *conn, photocard_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Photocard",
            id: photocard_id,
        })?;
    if photocard.creator_id != seller_id {
        return Err(CoreError::Forbidden("Only the card's creator can list it".into()).into());
    }
    Ok(photocard)
}

/// The card type's listing, locked for the rest of the transaction.
async fn listing_for_card(conn: &mut PgConnection, photocard_id: DbId) -> MarketResult<Listing> {
    let not_found = || CoreError::NotFound {
        entity: "Listing for photocard",
        id: photocard_id,
    };
    let listing = ListingRepo::find_by_photocard(&mut *conn, photocard_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(ListingRepo::lock_by_id(&mut *conn, listing.id)
        .await?
        .ok_or_else(not_found)?)
}

async fn summary(conn: &mut PgConnection, listing_id: DbId) -> MarketResult<ListingSummary> {
    Ok(ListingRepo::find_summary(&mut *conn, listing_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        })?)
}

/// Put `total_count` of the creator's units on the market.
pub async fn create_listing(
    pool: &PgPool,
    seller_id: DbId,
    input: &NewListing,
) -> MarketResult<ListingSummary> {
    let trade_grade: Grade = input.trade_grade.parse()?;
    let trade_genre: Genre = input.trade_genre.parse()?;
    let trade_note = input.trade_note.clone().unwrap_or_default();
    listing::validate_trade_note(&trade_note)?;
    if let Some(price) = input.price {
        card::validate_price(price)?;
    }

    let mut tx = pool.begin().await?;
    let photocard = creator_card(&mut tx, seller_id, input.photocard_id).await?;
    listing::validate_create_count(input.total_count, i64::from(photocard.total_issued))?;

    if ListingRepo::find_by_photocard(&mut *tx, photocard.id).await?.is_some() {
        return Err(CoreError::AlreadyInTrade(format!(
            "Card {} is already listed",
            photocard.id
        ))
        .into());
    }

    let created = ListingRepo::create(
        &mut *tx,
        &CreateListing {
            photocard_id: photocard.id,
            seller_id,
            price: input.price.unwrap_or(photocard.price),
            total_count: to_i32(input.total_count, "total_count")?,
            trade_grade: trade_grade.as_str().to_string(),
            trade_genre: trade_genre.as_str().to_string(),
            trade_note,
        },
    )
    .await;
    let created = match created {
        Ok(listing) => listing,
        Err(e) if is_unique_violation(&e, "uq_listings_photocard_id") => {
            return Err(CoreError::AlreadyInTrade(format!(
                "Card {} is already listed",
                photocard.id
            ))
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    let ids =
        UnitRepo::find_unlisted_ids(&mut *tx, photocard.id, seller_id, input.total_count).await?;
    if (ids.len() as i64) < input.total_count {
        return Err(CoreError::Validation(format!(
            "Only {} units are available to list",
            ids.len()
        ))
        .into());
    }
    let reserved = UnitRepo::reserve(&mut *tx, &ids, created.id).await?;
    if reserved != ids.len() as u64 {
        return Err(CoreError::Validation(
            "Some units were reserved concurrently; try again".into(),
        )
        .into());
    }

    let summary = summary(&mut tx, created.id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = seller_id,
        listing_id = created.id,
        photocard_id = photocard.id,
        count = input.total_count,
        "Listing created",
    );
    Ok(summary)
}

/// Patch a listing, resizing its reservation when `total_count` changes.
pub async fn update_listing(
    pool: &PgPool,
    seller_id: DbId,
    photocard_id: DbId,
    input: &ListingUpdate,
) -> MarketResult<ListingSummary> {
    let fields = UpdateListingFields {
        price: input.price,
        trade_grade: input
            .trade_grade
            .as_deref()
            .map(str::parse::<Grade>)
            .transpose()?
            .map(|g| g.as_str().to_string()),
        trade_genre: input
            .trade_genre
            .as_deref()
            .map(str::parse::<Genre>)
            .transpose()?
            .map(|g| g.as_str().to_string()),
        trade_note: input.trade_note.clone(),
    };
    if let Some(price) = fields.price {
        card::validate_price(price)?;
    }
    if let Some(note) = &fields.trade_note {
        listing::validate_trade_note(note)?;
    }

    let mut tx = pool.begin().await?;
    let photocard = creator_card(&mut tx, seller_id, photocard_id).await?;
    let current = listing_for_card(&mut tx, photocard.id).await?;

    ListingRepo::update_fields(&mut *tx, current.id, &fields).await?;

    if let Some(new_total) = input.total_count {
        let listed = UnitRepo::count_listed(&mut *tx, current.id).await?;
        let sold = i64::from(current.sold_count);
        let unlisted = UnitRepo::count_unlisted(&mut *tx, photocard.id, seller_id).await?;

        match listing::plan_resize(listed, sold, unlisted, new_total)? {
            ReservationChange::Unchanged => {}
            ReservationChange::Grow(n) => {
                let ids = UnitRepo::find_unlisted_ids(&mut *tx, photocard.id, seller_id, n).await?;
                let reserved = UnitRepo::reserve(&mut *tx, &ids, current.id).await?;
                if reserved != n as u64 {
                    return Err(CoreError::Validation(format!(
                        "Only {reserved} more units could be listed"
                    ))
                    .into());
                }
            }
            ReservationChange::Shrink(n) => {
                let ids = UnitRepo::find_listed_ids(&mut *tx, current.id, n, true).await?;
                let released = UnitRepo::release(&mut *tx, &ids).await?;
                if released != n as u64 {
                    return Err(CoreError::Conflict(
                        "Listing changed while it was being updated; try again".into(),
                    )
                    .into());
                }
            }
        }
        ListingRepo::set_total_count(&mut *tx, current.id, to_i32(new_total, "total_count")?)
            .await?;
    }

    let summary = summary(&mut tx, current.id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = seller_id,
        listing_id = current.id,
        total_count = summary.total_count,
        left_count = summary.left_count,
        "Listing updated",
    );
    Ok(summary)
}

/// Release every still-reserved unit and delete the listing.
pub async fn remove_listing(
    pool: &PgPool,
    seller_id: DbId,
    photocard_id: DbId,
) -> MarketResult<()> {
    let mut tx = pool.begin().await?;
    let photocard = creator_card(&mut tx, seller_id, photocard_id).await?;
    let current = listing_for_card(&mut tx, photocard.id).await?;

    let released = UnitRepo::release_all(&mut *tx, current.id).await?;
    if released == 0 {
        return Err(CoreError::Validation("No units are currently listed".into()).into());
    }
    ListingRepo::delete(&mut *tx, current.id).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = seller_id,
        listing_id = current.id,
        released,
        "Listing removed",
    );
    Ok(())
}

pub async fn get_listing(pool: &PgPool, listing_id: DbId) -> MarketResult<ListingSummary> {
    let mut conn = pool.acquire().await?;
    summary(&mut conn, listing_id).await
}

/// A cursor-paged slice of the market feed.
pub async fn get_market(pool: &PgPool, query: &MarketQuery) -> MarketResult<MarketPage> {
    let take = pagination::clamp_limit(query.take, DEFAULT_MARKET_TAKE, MAX_PAGE_SIZE);
    let order = match query.order_by.as_deref() {
        Some(value) => value.parse::<MarketOrder>()?,
        None => MarketOrder::default(),
    };
    let filter = listing_filter(
        query.grade.as_deref(),
        query.genre.as_deref(),
        query.keyword.as_deref(),
        query.is_sold_out,
    )?;

    let cursor = match query.cursor {
        Some(id) => {
            let row = ListingRepo::find_by_id(pool, id).await?.ok_or_else(|| {
                CoreError::Validation(format!("Cursor {id} does not reference a listing"))
            })?;
            Some(ListingCursor::from(&row))
        }
        None => None,
    };

    let mut lists = ListingRepo::list_market(pool, &filter, order, cursor, take + 1).await?;
    let has_more = lists.len() as i64 > take;
    lists.truncate(take as usize);
    let next_cursor = if has_more {
        lists.last().map(|l| l.id)
    } else {
        None
    };

    Ok(MarketPage {
        lists,
        next_cursor,
        has_more,
    })
}

/// The seller's own listings with per-grade counts.
pub async fn get_my_listings(
    pool: &PgPool,
    seller_id: DbId,
    query: &MyListingsQuery,
) -> MarketResult<GradedPage<ListingSummary>> {
    let request = PageRequest::new(query.page, query.page_size, DEFAULT_PAGE_SIZE)?;
    let filter = listing_filter(
        query.grade.as_deref(),
        query.genre.as_deref(),
        query.keyword.as_deref(),
        query.is_sold_out,
    )?;

    let (items, total) =
        ListingRepo::list_for_seller(pool, seller_id, &filter, request.page_size, request.offset())
            .await?;
    let grade_counts = ListingRepo::grade_counts_for_seller(pool, seller_id, &filter).await?;

    Ok(GradedPage {
        page: Page::new(items, request, total),
        grade_counts: fill_grade_counts(grade_counts),
    })
}
