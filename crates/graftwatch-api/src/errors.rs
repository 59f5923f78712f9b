// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Error taxonomy of the service. Every failure class maps to exactly one
/// HTTP status and one constant detail string; internal detail never leaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    InputInvalid,
    NotFound,
    Unimplemented,
    RateLimited,
    Timeout,
    StoreError,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InputInvalid => 422,
            Self::NotFound => 404,
            Self::Unimplemented => 501,
            Self::RateLimited => 429,
            Self::Timeout => 504,
            Self::StoreError => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub detail: String,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, detail: &str) -> Self {
        Self {
            code,
            detail: detail.to_string(),
        }
    }

    #[must_use]
    pub fn invalid_input(detail: &'static str) -> Self {
        Self::new(ApiErrorCode::InputInvalid, detail)
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(ApiErrorCode::NotFound, "resource not found")
    }

    #[must_use]
    pub fn unimplemented() -> Self {
        Self::new(ApiErrorCode::Unimplemented, "export format not implemented")
    }

    #[must_use]
    pub fn rate_limited() -> Self {
        Self::new(ApiErrorCode::RateLimited, "rate limit exceeded, retry in one minute")
    }

    #[must_use]
    pub fn timeout() -> Self {
        Self::new(ApiErrorCode::Timeout, "request deadline exceeded")
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(ApiErrorCode::StoreError, "internal error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_is_total() {
        assert_eq!(ApiErrorCode::InputInvalid.http_status(), 422);
        assert_eq!(ApiErrorCode::NotFound.http_status(), 404);
        assert_eq!(ApiErrorCode::Unimplemented.http_status(), 501);
        assert_eq!(ApiErrorCode::RateLimited.http_status(), 429);
        assert_eq!(ApiErrorCode::Timeout.http_status(), 504);
        assert_eq!(ApiErrorCode::StoreError.http_status(), 500);
    }

    #[test]
    fn details_are_single_line_and_opaque() {
        for err in [
            ApiError::invalid_input("invalid supplier identifier"),
            ApiError::not_found(),
            ApiError::unimplemented(),
            ApiError::rate_limited(),
            ApiError::timeout(),
            ApiError::internal(),
        ] {
            assert!(!err.detail.contains('\n'));
            assert!(!err.detail.to_lowercase().contains("sql"));
        }
    }
}
