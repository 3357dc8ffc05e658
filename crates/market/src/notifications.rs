//! Reads and read-marking over the notification outbox.
//!
//! Notifications are written by the operations that cause them, inside the
//! same transaction; this module never creates any.

use photomarket_core::error::CoreError;
use photomarket_core::pagination::{PageRequest, DEFAULT_NOTIFICATION_PAGE_SIZE};
use photomarket_core::types::DbId;
use photomarket_db::models::notification::Notification;
use photomarket_db::repositories::NotificationRepo;
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::MarketResult;
use crate::page::Page;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub unread_only: bool,
}

pub async fn list(
    pool: &PgPool,
    user_id: DbId,
    query: &NotificationQuery,
) -> MarketResult<Page<Notification>> {
    let request = PageRequest::new(query.page, query.page_size, DEFAULT_NOTIFICATION_PAGE_SIZE)?;
    let items = NotificationRepo::list_for_user(
        pool,
        user_id,
        query.unread_only,
        request.page_size,
        request.offset(),
    )
    .await?;
    let total = NotificationRepo::count_for_user(pool, user_id, query.unread_only).await?;
    Ok(Page::new(items, request, total))
}

pub async fn unread_count(pool: &PgPool, user_id: DbId) -> MarketResult<i64> {
    Ok(NotificationRepo::count_for_user(pool, user_id, true).await?)
}

/// Mark one notification read. Only its receiver may, and only once.
pub async fn mark_read(pool: &PgPool, user_id: DbId, notification_id: DbId) -> MarketResult<()> {
    if NotificationRepo::mark_read(pool, notification_id, user_id).await? {
        return Ok(());
    }
    match NotificationRepo::find_by_id(pool, notification_id).await? {
        Some(n) if n.receiver_id == user_id => {
            Err(CoreError::Conflict("Notification is already read".into()).into())
        }
        _ => Err(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }
        .into()),
    }
}

pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> MarketResult<u64> {
    let flipped = NotificationRepo::mark_all_read(pool, user_id).await?;
    tracing::debug!(user_id, flipped, "Notifications marked read");
    Ok(flipped)
}
