use photomarket_core::error::CoreError;

/// Error returned by every marketplace operation.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type MarketResult<T> = Result<T, MarketError>;

impl MarketError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            MarketError::Core(core) => Some(core),
            MarketError::Database(_) => None,
        }
    }
}

/// Whether `err` is a unique violation (SQLSTATE 23505) on `constraint`.
pub(crate) fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
