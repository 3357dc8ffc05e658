//! Handlers for the `/auth` resource (signup, login, refresh, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use photomarket_core::account;
use photomarket_core::error::CoreError;
use photomarket_db::models::session::CreateSession;
use photomarket_db::models::user::{CreateUser, User, UserResponse};
use photomarket_db::repositories::{SessionRepo, UserRepo};
use photomarket_market::accounts;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    account::validate_signup(&input.email, &input.password, &input.nickname)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = accounts::register(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_string(),
            nickname: input.nickname.trim().to_string(),
            password_hash,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserResponse::from(&user))),
    ))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::info!(user_id = user.id, "Login rejected");
        return Err(invalid());
    }

    let response = create_auth_response(&state, &user).await?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(DataResponse::new(response)))
}

/// POST /api/v1/auth/refresh
///
/// Rotates the refresh token: the presented one is revoked and a new pair
/// is issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid or expired refresh token".into()));

    let token_hash = hash_refresh_token(&input.refresh_token);
    let session = SessionRepo::find_active_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(invalid)?;

    // A concurrent refresh with the same token loses here.
    if !SessionRepo::revoke(&state.pool, session.id).await? {
        return Err(invalid());
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(DataResponse::new(response)))
}

/// POST /api/v1/auth/logout
///
/// Revokes every session of the caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue an access token plus a persisted refresh session.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;
    let access_token = generate_access_token(user.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at: Utc::now() + chrono::Duration::days(jwt.refresh_token_expiry_days),
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in: jwt.access_token_expiry_mins * 60,
        user: UserResponse::from(user),
    })
}
