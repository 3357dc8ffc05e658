//! Domain rules for the photocard marketplace.
//!
//! Everything in this crate is pure: no database, no HTTP. The `db`,
//! `market`, and `api` crates build on these types and validators.

pub mod account;
pub mod card;
pub mod error;
pub mod listing;
pub mod notification;
pub mod pagination;
pub mod points;
pub mod trade;
pub mod types;
