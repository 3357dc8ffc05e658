//! Page and cursor bounds shared by list endpoints.

use crate::error::CoreError;

/// Default page size for the owner gallery and "my listings".
pub const DEFAULT_PAGE_SIZE: i64 = 15;

/// Default page size for notification lists.
pub const DEFAULT_NOTIFICATION_PAGE_SIZE: i64 = 5;

/// Default page size for the public market feed.
pub const DEFAULT_MARKET_TAKE: i64 = 18;

/// Hard cap on any page size.
pub const MAX_PAGE_SIZE: i64 = 50;

/// Maximum length of a search keyword, in characters.
pub const MAX_KEYWORD_LEN: usize = 50;

/// Clamp a user-provided cursor page size into `1..=max`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
    offset: i64,
}

impl PageRequest {
    /// Validate `page >= 1` and `1 <= page_size <= MAX_PAGE_SIZE`.
    ///
    /// Unlike the cursor feed, explicit out-of-range values are rejected
    /// rather than clamped.
    pub fn new(
        page: Option<i64>,
        page_size: Option<i64>,
        default_size: i64,
    ) -> Result<Self, CoreError> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(default_size);
        if page < 1 {
            return Err(CoreError::Validation("Page must be 1 or greater".into()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(CoreError::Validation(format!(
                "Page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        let offset = (page - 1)
            .checked_mul(page_size)
            .ok_or_else(|| CoreError::Validation("Page is out of range".into()))?;
        Ok(Self {
            page,
            page_size,
            offset,
        })
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.page_size - 1) / self.page_size
    }
}

/// Reject keywords longer than [`MAX_KEYWORD_LEN`]. Blank keywords become `None`.
pub fn normalize_keyword(keyword: Option<&str>) -> Result<Option<String>, CoreError> {
    match keyword.map(str::trim) {
        None | Some("") => Ok(None),
        Some(k) if k.chars().count() > MAX_KEYWORD_LEN => Err(CoreError::Validation(format!(
            "Keyword must be at most {MAX_KEYWORD_LEN} characters"
        ))),
        Some(k) => Ok(Some(k.to_string())),
    }
}
