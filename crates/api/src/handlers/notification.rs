//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use photomarket_core::types::DbId;
use photomarket_db::models::notification::Notification;
use photomarket_market::notifications::{self, NotificationQuery};
use photomarket_market::page::Page;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked: u64,
}

/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Page<Notification>>>> {
    let page = notifications::list(&state.pool, auth.user_id, &params).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = notifications::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(UnreadCount { count })))
}

/// PATCH /api/v1/notifications/{id}/read
///
/// 204 on success, 404 for someone else's notification, 409 if already read.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(notification_id): Path<DbId>,
) -> AppResult<StatusCode> {
    notifications::mark_read(&state.pool, auth.user_id, notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let marked = notifications::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse::new(MarkedRead { marked })))
}
