//! Repository for the `notifications` table.

use photomarket_core::notification::NotificationCategory;
use photomarket_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::notification::Notification;

const COLUMNS: &str = "id, receiver_id, category, message, is_read, read_at, created_at";

pub struct NotificationRepo;

impl NotificationRepo {
    /// Append a notification. Runs inside the caller's transaction so it
    /// commits or rolls back with the change it reports.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        receiver_id: DbId,
        category: NotificationCategory,
        message: &str,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (receiver_id, category, message)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(receiver_id)
            .bind(category.as_str())
            .bind(message)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notifications WHERE id = $1");
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List notifications for a user, newest first.
    pub async fn list_for_user<'e>(
        executor: impl PgExecutor<'e>,
        receiver_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE receiver_id = $1 AND ($2 = false OR is_read = false)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(receiver_id)
            .bind(unread_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(executor)
            .await
    }

    pub async fn count_for_user<'e>(
        executor: impl PgExecutor<'e>,
        receiver_id: DbId,
        unread_only: bool,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications
             WHERE receiver_id = $1 AND ($2 = false OR is_read = false)",
        )
        .bind(receiver_id)
        .bind(unread_only)
        .fetch_one(executor)
        .await
    }

    /// Flip `is_read` once. `false` if the row is not the receiver's or was
    /// already read.
    pub async fn mark_read<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        receiver_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true, read_at = NOW()
             WHERE id = $1 AND receiver_id = $2 AND is_read = false",
        )
        .bind(id)
        .bind(receiver_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Mark every unread notification for a user. Returns the count flipped.
    pub async fn mark_all_read<'e>(
        executor: impl PgExecutor<'e>,
        receiver_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true, read_at = NOW()
             WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(receiver_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
