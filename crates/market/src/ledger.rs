//! Point ledger operations.
//!
//! Balances only move through single conditional updates, so a failed
//! credit or deduction leaves the row untouched.

use photomarket_core::error::CoreError;
use photomarket_core::points::{self, GRANT_COOLDOWN_MINS, GRANT_MAX, GRANT_MIN};
use photomarket_core::types::{DbId, Timestamp};
use photomarket_db::models::point::PointLedger;
use photomarket_db::repositories::PointRepo;
use rand::Rng;
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::error::MarketResult;

/// Balance and grant timing for a user.
#[derive(Debug, Serialize)]
pub struct PointStatus {
    pub balance: i64,
    pub last_grant_at: Option<Timestamp>,
    /// `None` before the first grant.
    pub next_grant_at: Option<Timestamp>,
}

impl From<&PointLedger> for PointStatus {
    fn from(ledger: &PointLedger) -> Self {
        Self {
            balance: ledger.balance,
            last_grant_at: ledger.last_grant_at,
            next_grant_at: points::next_grant_at(ledger.last_grant_at),
        }
    }
}

/// Outcome of a random grant.
#[derive(Debug, Serialize)]
pub struct Grant {
    pub amount: i64,
    #[serde(flatten)]
    pub status: PointStatus,
}

pub async fn get_ledger(pool: &PgPool, user_id: DbId) -> MarketResult<PointLedger> {
    PointRepo::find_by_user(pool, user_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "PointLedger",
                id: user_id,
            }
            .into()
        })
}

/// Add `amount` to a balance, at most once per cooldown window.
pub async fn credit(pool: &PgPool, user_id: DbId, amount: i64) -> MarketResult<PointLedger> {
    points::validate_credit_amount(amount)?;
    let ledger = get_ledger(pool, user_id).await?;

    match PointRepo::credit_if_cooled_down(pool, user_id, amount, GRANT_COOLDOWN_MINS).await? {
        Some(updated) => {
            tracing::info!(user_id, amount, balance = updated.balance, "Points granted");
            Ok(updated)
        }
        None => {
            let next = points::next_grant_at(ledger.last_grant_at)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "now".to_string());
            Err(CoreError::RateLimited(format!("Next grant is available at {next}")).into())
        }
    }
}

/// Draw a random amount in `GRANT_MIN..=GRANT_MAX` and credit it.
pub async fn grant_random(pool: &PgPool, user_id: DbId) -> MarketResult<Grant> {
    let amount = rand::rng().random_range(GRANT_MIN..=GRANT_MAX);
    let ledger = credit(pool, user_id, amount).await?;
    Ok(Grant {
        amount,
        status: PointStatus::from(&ledger),
    })
}

/// Subtract `amount` inside the caller's transaction.
///
/// Fails with `InsufficientPoints` and changes nothing when the balance is
/// short.
pub async fn deduct(
    conn: &mut PgConnection,
    user_id: DbId,
    amount: i64,
) -> MarketResult<PointLedger> {
    match PointRepo::deduct(&mut *conn, user_id, amount).await? {
        Some(ledger) => Ok(ledger),
        None => {
            let balance = PointRepo::find_by_user(&mut *conn, user_id)
                .await?
                .map_or(0, |l| l.balance);
            Err(CoreError::InsufficientPoints(format!(
                "Balance {balance} does not cover {amount} points"
            ))
            .into())
        }
    }
}
