//! Account creation.

use photomarket_core::error::CoreError;
use photomarket_db::models::user::{CreateUser, User};
use photomarket_db::repositories::{PointRepo, UserRepo};
use sqlx::PgPool;

use crate::error::{is_unique_violation, MarketResult};

/// Create a user and their zero-balance point ledger in one transaction.
///
/// Fields must already be validated and the password hashed.
pub async fn register(pool: &PgPool, input: &CreateUser) -> MarketResult<User> {
    let mut tx = pool.begin().await?;

    if UserRepo::email_exists(&mut *tx, &input.email).await? {
        return Err(CoreError::EmailAlreadyExists(format!(
            "'{}' is already registered",
            input.email
        ))
        .into());
    }

    let user = match UserRepo::create(&mut *tx, input).await {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e, "uq_users_email") => {
            return Err(CoreError::EmailAlreadyExists(format!(
                "'{}' is already registered",
                input.email
            ))
            .into());
        }
        Err(e) if is_unique_violation(&e, "uq_users_nickname") => {
            return Err(CoreError::Conflict(format!(
                "Nickname '{}' is already taken",
                input.nickname
            ))
            .into());
        }
        Err(e) => return Err(e.into()),
    };
    PointRepo::create_for_user(&mut *tx, user.id).await?;

    tx.commit().await?;
    tracing::info!(user_id = user.id, "Account registered");
    Ok(user)
}
