//! Point ledger rules: credit validation and the grant cooldown.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Minimum minutes between two grants to the same user.
pub const GRANT_COOLDOWN_MINS: i64 = 60;

/// Inclusive bounds of a random grant.
pub const GRANT_MIN: i64 = 1;
pub const GRANT_MAX: i64 = 10;

/// Credits must be strictly positive.
pub fn validate_credit_amount(amount: i64) -> Result<(), CoreError> {
    if amount <= 0 {
        return Err(CoreError::Validation(
            "Credit amount must be a positive integer".into(),
        ));
    }
    Ok(())
}

/// The earliest time the next grant is allowed. `None` means "now".
pub fn next_grant_at(last_grant_at: Option<Timestamp>) -> Option<Timestamp> {
    last_grant_at.map(|last| last + Duration::minutes(GRANT_COOLDOWN_MINS))
}

/// Total price of `count` units at `unit_price`, rejecting overflow.
pub fn total_price(unit_price: i64, count: i64) -> Result<i64, CoreError> {
    unit_price
        .checked_mul(count)
        .ok_or_else(|| CoreError::InvalidData("Purchase total is too large".into()))
}
