pub mod auth;
pub mod card;
pub mod listing;
pub mod notification;
pub mod purchase;
pub mod trade;
pub mod user;
