//! Trade proposal lifecycle.
//!
//! `PENDING -> COMPLETED` on approval, `PENDING -> REJECTED` on rejection.
//! Both outcomes are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a proposal message, in characters.
pub const MAX_CONTENT_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Pending,
    Completed,
    Rejected,
}

impl TradeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeStatus::Pending => "PENDING",
            TradeStatus::Completed => "COMPLETED",
            TradeStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, TradeStatus::Pending)
    }

    pub fn can_transition_to(self, next: TradeStatus) -> bool {
        matches!(
            (self, next),
            (TradeStatus::Pending, TradeStatus::Completed)
                | (TradeStatus::Pending, TradeStatus::Rejected)
        )
    }

    /// Fail with `InvalidTradeStatus` unless `self -> next` is allowed.
    pub fn ensure_transition(self, next: TradeStatus) -> Result<(), CoreError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::InvalidTradeStatus(format!(
                "Trade is already {self}"
            )))
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TradeStatus::Pending),
            "COMPLETED" => Ok(TradeStatus::Completed),
            "REJECTED" => Ok(TradeStatus::Rejected),
            other => Err(CoreError::Internal(format!("Unknown trade status '{other}'"))),
        }
    }
}

pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(CoreError::Validation(format!(
            "Trade content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_complete_or_reject() {
        assert!(TradeStatus::Pending.ensure_transition(TradeStatus::Completed).is_ok());
        assert!(TradeStatus::Pending.ensure_transition(TradeStatus::Rejected).is_ok());
    }

    #[test]
    fn terminal_states_do_not_move() {
        for from in [TradeStatus::Completed, TradeStatus::Rejected] {
            assert!(from.is_terminal());
            for to in [TradeStatus::Pending, TradeStatus::Completed, TradeStatus::Rejected] {
                let err = from.ensure_transition(to).unwrap_err();
                assert!(matches!(err, CoreError::InvalidTradeStatus(_)));
            }
        }
    }

    #[test]
    fn status_parses_column_values() {
        assert_eq!("REJECTED".parse::<TradeStatus>().unwrap(), TradeStatus::Rejected);
        assert!("rejected".parse::<TradeStatus>().is_err());
    }

    #[test]
    fn content_length_is_bounded() {
        assert!(validate_content("").is_ok());
        assert!(validate_content(&"c".repeat(MAX_CONTENT_LEN + 1)).is_err());
    }
}
