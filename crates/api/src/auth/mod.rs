//! Credential handling.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access tokens and opaque refresh tokens.

pub mod jwt;
pub mod password;
