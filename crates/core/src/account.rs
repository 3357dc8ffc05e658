//! Sign-up field validation.

use crate::error::CoreError;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum nickname length, in characters.
pub const MAX_NICKNAME_LEN: usize = 20;

pub fn validate_signup(email: &str, password: &str, nickname: &str) -> Result<(), CoreError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() || nickname.trim().is_empty() {
        return Err(CoreError::InvalidData(
            "Email, password and nickname are required".into(),
        ));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => {
            return Err(CoreError::Validation(format!(
                "'{email}' is not a valid email address"
            )))
        }
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if nickname.trim().chars().count() > MAX_NICKNAME_LEN {
        return Err(CoreError::Validation(format!(
            "Nickname must be at most {MAX_NICKNAME_LEN} characters"
        )));
    }
    Ok(())
}
