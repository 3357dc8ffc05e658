//! Repository for the `users` table.

use photomarket_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, nickname, password_hash, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, nickname, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.nickname)
            .bind(&input.password_hash)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(executor)
            .await
    }

    pub async fn email_exists<'e>(
        executor: impl PgExecutor<'e>,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(executor)
            .await
    }
}
