//! Row structs and DTOs.
//!
//! Each submodule holds the `FromRow` entity for its table plus the
//! create/update inputs and any joined read models built on top of it.

pub mod card;
pub mod listing;
pub mod notification;
pub mod point;
pub mod purchase;
pub mod session;
pub mod trade;
pub mod user;
