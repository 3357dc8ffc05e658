//! Shared response envelope.
//!
//! Every successful API response is `{ "data": ... }`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
