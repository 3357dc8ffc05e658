//! Notification categories and the messages attached to them.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    TradeOffered,
    TradeAccepted,
    TradeRejected,
    Purchased,
    Sold,
    SoldOut,
}

impl NotificationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationCategory::TradeOffered => "TRADE_OFFERED",
            NotificationCategory::TradeAccepted => "TRADE_ACCEPTED",
            NotificationCategory::TradeRejected => "TRADE_REJECTED",
            NotificationCategory::Purchased => "PURCHASED",
            NotificationCategory::Sold => "SOLD",
            NotificationCategory::SoldOut => "SOLD_OUT",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn trade_offered_message(requester: &str, card_name: &str) -> String {
    format!("{requester} proposed a trade for your [{card_name}] card.")
}

pub fn trade_accepted_message(card_name: &str) -> String {
    format!("Your trade for the [{card_name}] card was completed.")
}

pub fn trade_rejected_message(card_name: &str) -> String {
    format!("Your trade proposal for the [{card_name}] card was rejected.")
}

pub fn purchased_message(card_name: &str, count: i64) -> String {
    format!("You purchased {count} [{card_name}] card(s).")
}

pub fn sold_message(buyer: &str, card_name: &str, count: i64) -> String {
    format!("{buyer} bought {count} of your [{card_name}] card(s).")
}

pub fn sold_out_message(card_name: &str) -> String {
    format!("Your [{card_name}] listing is sold out.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_spelling_matches_column_values() {
        assert_eq!(NotificationCategory::SoldOut.as_str(), "SOLD_OUT");
        assert_eq!(NotificationCategory::TradeOffered.to_string(), "TRADE_OFFERED");
    }

    #[test]
    fn messages_name_the_card() {
        assert!(sold_message("mina", "RM", 2).contains("[RM]"));
        assert!(purchased_message("RM", 2).contains('2'));
        assert!(trade_offered_message("mina", "RM").starts_with("mina"));
    }
}
