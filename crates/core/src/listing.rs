//! Listing rules: reservation sizing and market feed ordering.

use std::str::FromStr;

use crate::error::CoreError;

/// Maximum length of a listing's trade note, in characters.
pub const MAX_TRADE_NOTE_LEN: usize = 500;

/// Validate the requested size of a brand-new listing.
///
/// A listing must reserve at least one unit and never more than were issued.
pub fn validate_create_count(total_count: i64, total_issued: i64) -> Result<(), CoreError> {
    if total_count < 1 || total_count > total_issued {
        return Err(CoreError::Validation(format!(
            "Listing count must be between 1 and {total_issued}"
        )));
    }
    Ok(())
}

pub fn validate_trade_note(note: &str) -> Result<(), CoreError> {
    if note.chars().count() > MAX_TRADE_NOTE_LEN {
        return Err(CoreError::Validation(format!(
            "Trade note must be at most {MAX_TRADE_NOTE_LEN} characters"
        )));
    }
    Ok(())
}

/// How the reserved set of a listing must change to reach a new total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationChange {
    Unchanged,
    /// Reserve this many more of the seller's unlisted units.
    Grow(i64),
    /// Release this many currently reserved units.
    Shrink(i64),
}

/// Plan the reservation change for a listing update.
///
/// `new_total` counts already-sold units too, so the listed target is
/// `new_total - sold`. The listed target must fit inside what is listed now
/// plus what the seller still holds unlisted.
pub fn plan_resize(
    listed: i64,
    sold: i64,
    unlisted_available: i64,
    new_total: i64,
) -> Result<ReservationChange, CoreError> {
    if new_total < 1 {
        return Err(CoreError::Validation(
            "Listing count must be at least 1".into(),
        ));
    }
    if new_total < sold {
        return Err(CoreError::Validation(format!(
            "Listing count cannot drop below the {sold} units already sold"
        )));
    }
    let target_listed = new_total - sold;
    if target_listed > listed + unlisted_available {
        return Err(CoreError::Validation(format!(
            "Only {} units are available to list",
            listed + unlisted_available
        )));
    }
    Ok(match target_listed.cmp(&listed) {
        std::cmp::Ordering::Equal => ReservationChange::Unchanged,
        std::cmp::Ordering::Greater => ReservationChange::Grow(target_listed - listed),
        std::cmp::Ordering::Less => ReservationChange::Shrink(listed - target_listed),
    })
}

/// Sort order for the public market feed.
///
/// Every order breaks ties on ascending listing id so cursors stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketOrder {
    #[default]
    Recent,
    PriceAsc,
    PriceDesc,
}

impl FromStr for MarketOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(MarketOrder::Recent),
            "price_asc" => Ok(MarketOrder::PriceAsc),
            "price_desc" => Ok(MarketOrder::PriceDesc),
            other => Err(CoreError::Validation(format!(
                "Invalid order_by '{other}'. Must be one of: recent, price_asc, price_desc"
            ))),
        }
    }
}
