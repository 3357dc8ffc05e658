//! Repository for the `point_ledgers` table.
//!
//! Balance changes are single conditional `UPDATE`s: the guard lives in the
//! `WHERE` clause and the caller inspects whether a row came back.

use photomarket_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::point::PointLedger;

const COLUMNS: &str = "user_id, balance, last_grant_at, created_at, updated_at";

pub struct PointRepo;

impl PointRepo {
    /// Open a zero-balance ledger for a new user.
    pub async fn create_for_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<PointLedger, sqlx::Error> {
        let query = format!(
            "INSERT INTO point_ledgers (user_id) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PointLedger>(&query)
            .bind(user_id)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Option<PointLedger>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM point_ledgers WHERE user_id = $1");
        sqlx::query_as::<_, PointLedger>(&query)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Subtract `amount` only if the balance covers it.
    ///
    /// Returns the updated ledger, or `None` when the balance was short (or
    /// the ledger does not exist). Nothing changes in that case.
    pub async fn deduct<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        amount: i64,
    ) -> Result<Option<PointLedger>, sqlx::Error> {
        let query = format!(
            "UPDATE point_ledgers
             SET balance = balance - $2, updated_at = NOW()
             WHERE user_id = $1 AND balance >= $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PointLedger>(&query)
            .bind(user_id)
            .bind(amount)
            .fetch_optional(executor)
            .await
    }

    /// Add `amount` and stamp `last_grant_at`, but only when the previous
    /// grant is at least `cooldown_mins` old (or there was none).
    ///
    /// Returns `None` while the cooldown is still running.
    pub async fn credit_if_cooled_down<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        amount: i64,
        cooldown_mins: i64,
    ) -> Result<Option<PointLedger>, sqlx::Error> {
        let query = format!(
            "UPDATE point_ledgers
             SET balance = balance + $2, last_grant_at = NOW(), updated_at = NOW()
             WHERE user_id = $1
               AND (last_grant_at IS NULL
                    OR last_grant_at <= NOW() - make_interval(mins => $3::INT))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PointLedger>(&query)
            .bind(user_id)
            .bind(amount)
            .bind(cooldown_mins)
            .fetch_optional(executor)
            .await
    }

    /// Unconditional top-up, used to seed balances.
    pub async fn add<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        amount: i64,
    ) -> Result<Option<PointLedger>, sqlx::Error> {
        let query = format!(
            "UPDATE point_ledgers
             SET balance = balance + $2, updated_at = NOW()
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PointLedger>(&query)
            .bind(user_id)
            .bind(amount)
            .fetch_optional(executor)
            .await
    }
}
