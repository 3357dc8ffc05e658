//! Repository for the `listings` table and the market feed.

use photomarket_core::listing::MarketOrder;
use photomarket_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::card::GradeCount;
use crate::models::listing::{
    CreateListing, Listing, ListingCursor, ListingFilter, ListingSummary, UpdateListingFields,
};

const COLUMNS: &str = "id, photocard_id, seller_id, price, total_count, sold_count, \
                        trade_grade, trade_genre, trade_note, created_at, updated_at";

/// Select list for [`ListingSummary`].
const SUMMARY_COLUMNS: &str = "l.id, l.photocard_id, l.seller_id, s.nickname AS seller_nickname, \
                                p.name, p.description, p.image_url, p.grade, p.genre, \
                                l.price, l.total_count, \
                                (l.total_count - l.sold_count)::BIGINT AS left_count, \
                                l.sold_count::BIGINT AS sold_count, \
                                l.trade_grade, l.trade_genre, l.trade_note, l.created_at";

/// Listings joined with their card and seller.
const SUMMARY_FROM: &str = "listings l
             JOIN photocards p ON p.id = l.photocard_id
             JOIN users s ON s.id = l.seller_id";

/// Card-attribute and sold-out filters on `$1..$4`. The keyword is a plain
/// case-insensitive substring.
const SUMMARY_FILTER: &str = "($1::TEXT IS NULL OR p.grade = $1)
               AND ($2::TEXT IS NULL OR p.genre = $2)
               AND ($3::TEXT IS NULL OR strpos(lower(p.name), lower($3)) > 0)
               AND ($4::BOOL IS NULL OR (l.sold_count = l.total_count) = $4)";

pub struct ListingRepo;

impl ListingRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateListing,
    ) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings
                (photocard_id, seller_id, price, total_count, trade_grade, trade_genre, trade_note)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(input.photocard_id)
            .bind(input.seller_id)
            .bind(input.price)
            .bind(input.total_count)
            .bind(&input.trade_grade)
            .bind(&input.trade_genre)
            .bind(&input.trade_note)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Like [`Self::find_by_id`], but holds the row lock until the
    /// transaction ends. Flows that move units out of a listing take this
    /// lock first, so they queue behind each other and behind a resize.
    pub async fn lock_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The listing covering a card type, if any. There is at most one.
    pub async fn find_by_photocard<'e>(
        executor: impl PgExecutor<'e>,
        photocard_id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE photocard_id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(photocard_id)
            .fetch_optional(executor)
            .await
    }

    /// Patch the non-inventory fields. Only non-`None` fields are applied.
    pub async fn update_fields<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateListingFields,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                price = COALESCE($2, price),
                trade_grade = COALESCE($3, trade_grade),
                trade_genre = COALESCE($4, trade_genre),
                trade_note = COALESCE($5, trade_note),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(input.price)
            .bind(&input.trade_grade)
            .bind(&input.trade_genre)
            .bind(&input.trade_note)
            .fetch_optional(executor)
            .await
    }

    pub async fn set_total_count<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        total_count: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET total_count = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(total_count)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Count `count` more units as having left the listing.
    pub async fn record_sold<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        count: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET sold_count = sold_count + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(count)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete a listing. Purchase history rows that point at it lose their
    /// `listing_id` through `ON DELETE SET NULL`.
    pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn find_summary<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<ListingSummary>, sqlx::Error> {
        let query = format!("SELECT {SUMMARY_COLUMNS} FROM {SUMMARY_FROM} WHERE l.id = $1");
        sqlx::query_as::<_, ListingSummary>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// One page of the public market feed.
    ///
    /// Rows come strictly after `cursor` in `order`. Every order ends with
    /// `l.id ASC`, so `(sort key, id)` is unique and the cursor predicate is
    /// exact.
    pub async fn list_market<'e>(
        executor: impl PgExecutor<'e>,
        filter: &ListingFilter,
        order: MarketOrder,
        cursor: Option<ListingCursor>,
        limit: i64,
    ) -> Result<Vec<ListingSummary>, sqlx::Error> {
        let (after_cursor, order_by) = match order {
            MarketOrder::Recent => (
                "(l.created_at < $7 OR (l.created_at = $7 AND l.id > $5))",
                "l.created_at DESC, l.id ASC",
            ),
            MarketOrder::PriceAsc => (
                "(l.price > $6 OR (l.price = $6 AND l.id > $5))",
                "l.price ASC, l.id ASC",
            ),
            MarketOrder::PriceDesc => (
                "(l.price < $6 OR (l.price = $6 AND l.id > $5))",
                "l.price DESC, l.id ASC",
            ),
        };
        let query = format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM {SUMMARY_FROM}
             WHERE {SUMMARY_FILTER}
               AND ($5::BIGINT IS NULL OR {after_cursor})
             ORDER BY {order_by}
             LIMIT $8"
        );
        sqlx::query_as::<_, ListingSummary>(&query)
            .bind(&filter.grade)
            .bind(&filter.genre)
            .bind(&filter.keyword)
            .bind(filter.sold_out)
            .bind(cursor.map(|c| c.id))
            .bind(cursor.map(|c| c.price))
            .bind(cursor.map(|c| c.created_at))
            .bind(limit)
            .fetch_all(executor)
            .await
    }

    /// One page of a seller's listings, newest first, with the total match
    /// count.
    pub async fn list_for_seller(
        pool: &PgPool,
        seller_id: DbId,
        filter: &ListingFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ListingSummary>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM {SUMMARY_FROM}
             WHERE {SUMMARY_FILTER} AND l.seller_id = $5
             ORDER BY l.created_at DESC, l.id DESC
             LIMIT $6 OFFSET $7"
        );
        let items = sqlx::query_as::<_, ListingSummary>(&query)
            .bind(&filter.grade)
            .bind(&filter.genre)
            .bind(&filter.keyword)
            .bind(filter.sold_out)
            .bind(seller_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        let count_query = format!(
            "SELECT COUNT(*) FROM {SUMMARY_FROM}
             WHERE {SUMMARY_FILTER} AND l.seller_id = $5"
        );
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(&filter.grade)
            .bind(&filter.genre)
            .bind(&filter.keyword)
            .bind(filter.sold_out)
            .bind(seller_id)
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    /// Listings per card grade for a seller, under the same filters.
    pub async fn grade_counts_for_seller<'e>(
        executor: impl PgExecutor<'e>,
        seller_id: DbId,
        filter: &ListingFilter,
    ) -> Result<Vec<GradeCount>, sqlx::Error> {
        let query = format!(
            "SELECT p.grade, COUNT(*) AS count
             FROM {SUMMARY_FROM}
             WHERE {SUMMARY_FILTER} AND l.seller_id = $5
             GROUP BY p.grade"
        );
        sqlx::query_as::<_, GradeCount>(&query)
            .bind(&filter.grade)
            .bind(&filter.genre)
            .bind(&filter.keyword)
            .bind(filter.sold_out)
            .bind(seller_id)
            .fetch_all(executor)
            .await
    }
}
