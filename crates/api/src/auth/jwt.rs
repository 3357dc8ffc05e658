//! Access tokens and refresh tokens.
//!
//! Access tokens are HS256 JWTs carrying [`Claims`]. Refresh tokens are opaque
//! random strings; only their SHA-256 hex digest is persisted.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use photomarket_core::types::DbId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 14;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `60`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `14`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }
}

pub fn generate_access_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Checks signature and expiry.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Returns `(plaintext, sha256_hex)`. Only the hash is stored.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 14,
        }
    }

    #[test]
    fn access_token_round_trips_subject() {
        let config = config("test-secret-that-is-long-enough-for-hmac");
        let token = generate_access_token(42, &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config("test-secret-that-is-long-enough-for-hmac");
        // Well past the default 60 second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let token = generate_access_token(1, &config("secret-alpha")).unwrap();
        assert!(validate_token(&token, &config("secret-bravo")).is_err());
    }

    #[test]
    fn refresh_token_hash_is_stable_hex() {
        let (plaintext, hash) = generate_refresh_token();
        assert_eq!(hash, hash_refresh_token(&plaintext));
        assert_eq!(hash.len(), 64);
        assert_ne!(generate_refresh_token().0, plaintext);
    }
}
