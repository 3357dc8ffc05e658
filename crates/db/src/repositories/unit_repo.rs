//! Repository for the `user_photocards` table (owned units).
//!
//! Every state change is a conditional `UPDATE` that repeats the expected
//! prior state in its `WHERE` clause. Callers compare the affected-row count
//! with what they asked for and abort the surrounding transaction on a
//! mismatch.

use photomarket_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::card::UserPhotocard;

const COLUMNS: &str = "id, photocard_id, owner_id, is_listed, listing_id, created_at, updated_at";

pub struct UnitRepo;

impl UnitRepo {
    /// Mint `count` unlisted units of a card type for `owner_id`.
    pub async fn issue<'e>(
        executor: impl PgExecutor<'e>,
        photocard_id: DbId,
        owner_id: DbId,
        count: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_photocards (photocard_id, owner_id)
             SELECT $1, $2 FROM generate_series(1, $3)",
        )
        .bind(photocard_id)
        .bind(owner_id)
        .bind(count)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<UserPhotocard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_photocards WHERE id = $1");
        sqlx::query_as::<_, UserPhotocard>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Ids of up to `limit` unlisted units of a card type held by `owner_id`,
    /// lowest id first.
    pub async fn find_unlisted_ids<'e>(
        executor: impl PgExecutor<'e>,
        photocard_id: DbId,
        owner_id: DbId,
        limit: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM user_photocards
             WHERE photocard_id = $1 AND owner_id = $2 AND is_listed = false
             ORDER BY id ASC
             LIMIT $3",
        )
        .bind(photocard_id)
        .bind(owner_id)
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    pub async fn count_unlisted<'e>(
        executor: impl PgExecutor<'e>,
        photocard_id: DbId,
        owner_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_photocards
             WHERE photocard_id = $1 AND owner_id = $2 AND is_listed = false",
        )
        .bind(photocard_id)
        .bind(owner_id)
        .fetch_one(executor)
        .await
    }

    /// Reserve the given units for a listing. Units that are already listed
    /// are skipped, so the returned count may fall short of `ids.len()`.
    pub async fn reserve<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
        listing_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_photocards
             SET is_listed = true, listing_id = $2, updated_at = NOW()
             WHERE id = ANY($1) AND is_listed = false",
        )
        .bind(ids)
        .bind(listing_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Ids of up to `limit` units still listed under `listing_id`.
    ///
    /// `highest_first` picks from the top of the id range, which is the
    /// order a listing shrink releases in. Purchases take the lowest ids.
    pub async fn find_listed_ids<'e>(
        executor: impl PgExecutor<'e>,
        listing_id: DbId,
        limit: i64,
        highest_first: bool,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let direction = if highest_first { "DESC" } else { "ASC" };
        let query = format!(
            "SELECT id FROM user_photocards
             WHERE listing_id = $1 AND is_listed = true
             ORDER BY id {direction}
             LIMIT $2"
        );
        sqlx::query_scalar(&query)
            .bind(listing_id)
            .bind(limit)
            .fetch_all(executor)
            .await
    }

    /// The lowest-id unit still listed under `listing_id`.
    pub async fn first_listed<'e>(
        executor: impl PgExecutor<'e>,
        listing_id: DbId,
    ) -> Result<Option<UserPhotocard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_photocards
             WHERE listing_id = $1 AND is_listed = true
             ORDER BY id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, UserPhotocard>(&query)
            .bind(listing_id)
            .fetch_optional(executor)
            .await
    }

    /// Return listed units to their owner's unlisted stock.
    pub async fn release<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_photocards
             SET is_listed = false, listing_id = NULL, updated_at = NOW()
             WHERE id = ANY($1) AND is_listed = true",
        )
        .bind(ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Release every unit still reserved by a listing.
    pub async fn release_all<'e>(
        executor: impl PgExecutor<'e>,
        listing_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_photocards
             SET is_listed = false, listing_id = NULL, updated_at = NOW()
             WHERE listing_id = $1 AND is_listed = true",
        )
        .bind(listing_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Units still reserved by a listing.
    pub async fn count_listed<'e>(
        executor: impl PgExecutor<'e>,
        listing_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_photocards WHERE listing_id = $1 AND is_listed = true",
        )
        .bind(listing_id)
        .fetch_one(executor)
        .await
    }

    /// Hand listed units to a buyer. Only rows still listed under
    /// `listing_id` move; the caller must check the count and record the
    /// sale on the listing. Moved units keep no tie to the listing.
    pub async fn transfer_listed<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
        listing_id: DbId,
        buyer_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_photocards
             SET owner_id = $3, is_listed = false, listing_id = NULL, updated_at = NOW()
             WHERE id = ANY($1) AND listing_id = $2 AND is_listed = true",
        )
        .bind(ids)
        .bind(listing_id)
        .bind(buyer_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Move one unit listed under `listing_id` from `from_owner` to
    /// `to_owner`, taking it off the listing. `false` if the unit is no
    /// longer listed there or changed hands.
    pub async fn take_listed<'e>(
        executor: impl PgExecutor<'e>,
        unit_id: DbId,
        listing_id: DbId,
        from_owner: DbId,
        to_owner: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_photocards
             SET owner_id = $4, is_listed = false, listing_id = NULL, updated_at = NOW()
             WHERE id = $1 AND listing_id = $2 AND owner_id = $3 AND is_listed = true",
        )
        .bind(unit_id)
        .bind(listing_id)
        .bind(from_owner)
        .bind(to_owner)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Move one unlisted unit from `from_owner` to `to_owner`.
    pub async fn transfer_unlisted<'e>(
        executor: impl PgExecutor<'e>,
        unit_id: DbId,
        from_owner: DbId,
        to_owner: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_photocards
             SET owner_id = $3, updated_at = NOW()
             WHERE id = $1 AND owner_id = $2 AND is_listed = false",
        )
        .bind(unit_id)
        .bind(from_owner)
        .bind(to_owner)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
