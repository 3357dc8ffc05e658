use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use photomarket_core::error::CoreError;
use photomarket_market::MarketError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ status, code, message }` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::Core(core) => AppError::Core(core),
            MarketError::Database(db) => AppError::Database(db),
        }
    }
}

/// HTTP status for a domain error.
pub fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::Validation(_) | CoreError::InvalidData(_) => StatusCode::BAD_REQUEST,
        CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden(_) | CoreError::InsufficientPoints(_) => StatusCode::FORBIDDEN,
        CoreError::AlreadyInTrade(_)
        | CoreError::CardAlreadySold(_)
        | CoreError::CardUnavailable(_)
        | CoreError::InvalidTradeStatus(_)
        | CoreError::EmailAlreadyExists(_)
        | CoreError::Conflict(_) => StatusCode::CONFLICT,
        CoreError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    core.code(),
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        core.code(),
                        "An internal error occurred".to_string(),
                    )
                }
                CoreError::Validation(msg)
                | CoreError::InvalidData(msg)
                | CoreError::Unauthorized(msg)
                | CoreError::Forbidden(msg)
                | CoreError::InsufficientPoints(msg)
                | CoreError::AlreadyInTrade(msg)
                | CoreError::CardAlreadySold(msg)
                | CoreError::CardUnavailable(msg)
                | CoreError::InvalidTradeStatus(msg)
                | CoreError::EmailAlreadyExists(msg)
                | CoreError::Conflict(msg)
                | CoreError::RateLimited(msg) => (core_status(core), core.code(), msg.clone()),
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "status": status.as_u16(),
            "code": code,
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on constraints named `uq_*` map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // 23505 = unique_violation
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
