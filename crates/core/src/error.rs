use crate::types::DbId;

/// Domain error taxonomy shared by every layer.
///
/// Variants describe *what* went wrong, not how it is transported. The API
/// crate owns the HTTP status mapping; [`CoreError::code`] gives the stable
/// machine-readable code that ends up in response bodies.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Insufficient points: {0}")]
    InsufficientPoints(String),

    #[error("Already in trade: {0}")]
    AlreadyInTrade(String),

    /// Lost a purchase race. The caller may retry from the top.
    #[error("Card already sold: {0}")]
    CardAlreadySold(String),

    #[error("Card unavailable: {0}")]
    CardUnavailable(String),

    #[error("Invalid trade status: {0}")]
    InvalidTradeStatus(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Stable error code string used in API response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::InvalidData(_) => "INVALID_DATA",
            CoreError::Unauthorized(_) => "UNAUTHORIZED",
            CoreError::Forbidden(_) => "FORBIDDEN",
            CoreError::InsufficientPoints(_) => "INSUFFICIENT_POINTS",
            CoreError::AlreadyInTrade(_) => "ALREADY_IN_TRADE",
            CoreError::CardAlreadySold(_) => "ALREADY_SOLD",
            CoreError::CardUnavailable(_) => "CARD_UNAVAILABLE",
            CoreError::InvalidTradeStatus(_) => "INVALID_TRADE_STATUS",
            CoreError::EmailAlreadyExists(_) => "EMAIL_EXISTS",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::RateLimited(_) => "TOO_MANY_REQUESTS",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the client may simply repeat the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::CardAlreadySold(_))
    }
}
