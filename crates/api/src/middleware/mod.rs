//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user behind a Bearer token.

pub mod auth;
