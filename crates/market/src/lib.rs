//! Business operations of the photocard marketplace.
//!
//! Every mutating operation opens one transaction on the pool, threads
//! `&mut *tx` through each repository call, and commits only at the end.
//! An early return drops the transaction, which rolls it back.
//!
//! - [`accounts`] -- sign-up with an empty point ledger.
//! - [`ledger`] -- balances, timed grants and guarded deductions.
//! - [`cards`] -- issuing card types and the owner's gallery.
//! - [`listings`] -- listing lifecycle and the market feed.
//! - [`trades`] -- trade proposal lifecycle.
//! - [`settlement`] -- purchases.
//! - [`notifications`] -- the per-user notification outbox.

pub mod accounts;
pub mod cards;
pub mod error;
pub mod ledger;
pub mod listings;
pub mod notifications;
pub mod page;
pub mod settlement;
pub mod trades;

pub use error::{MarketError, MarketResult};
