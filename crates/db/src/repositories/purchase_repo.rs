//! Repository for the `purchase_histories` table.

use photomarket_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::purchase::{CreatePurchase, PurchaseHistory, PurchaseView};

const COLUMNS: &str =
    "id, purchaser_id, photocard_id, listing_id, unit_count, total_price, created_at";

pub struct PurchaseRepo;

impl PurchaseRepo {
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreatePurchase,
    ) -> Result<PurchaseHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO purchase_histories
                (purchaser_id, photocard_id, listing_id, unit_count, total_price)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PurchaseHistory>(&query)
            .bind(input.purchaser_id)
            .bind(input.photocard_id)
            .bind(input.listing_id)
            .bind(input.unit_count)
            .bind(input.total_price)
            .fetch_one(executor)
            .await
    }

    /// One page of a user's purchases, newest first, with the total count.
    pub async fn list_for_user(
        pool: &PgPool,
        purchaser_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PurchaseView>, i64), sqlx::Error> {
        let items = sqlx::query_as::<_, PurchaseView>(
            "SELECT h.id, h.photocard_id, h.listing_id, p.name, p.image_url, p.grade, p.genre,
                    h.unit_count, h.total_price, h.created_at
             FROM purchase_histories h
             JOIN photocards p ON p.id = h.photocard_id
             WHERE h.purchaser_id = $1
             ORDER BY h.created_at DESC, h.id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(purchaser_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM purchase_histories WHERE purchaser_id = $1")
                .bind(purchaser_id)
                .fetch_one(pool)
                .await?;

        Ok((items, total))
    }

    pub async fn count_for_user<'e>(
        executor: impl PgExecutor<'e>,
        purchaser_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM purchase_histories WHERE purchaser_id = $1")
            .bind(purchaser_id)
            .fetch_one(executor)
            .await
    }
}
