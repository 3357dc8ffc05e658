//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use photomarket_core::error::CoreError;
use photomarket_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller behind a valid `Authorization: Bearer <token>` header.
///
/// Add it as a handler argument to require authentication:
///
/// ```ignore
/// async fn my_cards(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user_id, "listing cards");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
