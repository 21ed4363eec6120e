//! API error codes and formatting

use std::fmt;
use thiserror::Error;

/// Every failure the users API can report to a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Routing
    PathNotFound,
    MissingUserId,
    InvalidRequest,

    // Handlers
    UserNotFound,
    InvalidInput,
    StoreUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PathNotFound => "PathNotFound",
            Self::MissingUserId => "MissingUserId",
            Self::InvalidRequest => "InvalidRequest",
            Self::UserNotFound => "UserNotFound",
            Self::InvalidInput => "InvalidInput",
            Self::StoreUnavailable => "StoreUnavailable",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::PathNotFound | Self::MissingUserId | Self::InvalidRequest | Self::InvalidInput => {
                400
            }
            Self::UserNotFound => 404,
            Self::StoreUnavailable => 503,
        }
    }

    /// Message returned to callers when nothing more specific is known
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::PathNotFound => "Path not found",
            Self::MissingUserId => "User id not found",
            Self::InvalidRequest => "Invalid request",
            Self::UserNotFound => "User not found",
            Self::InvalidInput => "Invalid request body",
            Self::StoreUnavailable => "Service unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error surfaced at the router boundary
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl From<ErrorCode> for ApiError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_errors_are_bad_requests() {
        for code in [
            ErrorCode::PathNotFound,
            ErrorCode::MissingUserId,
            ErrorCode::InvalidRequest,
        ] {
            assert_eq!(code.http_status(), 400);
        }
    }

    #[test]
    fn test_error_from_code_uses_default_message() {
        let error = ApiError::from(ErrorCode::MissingUserId);
        assert_eq!(error.message, "User id not found");
        assert_eq!(error.http_status(), 400);
    }

    #[test]
    fn test_handler_error_statuses() {
        assert_eq!(ErrorCode::UserNotFound.http_status(), 404);
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::StoreUnavailable.http_status(), 503);
    }

    #[test]
    fn test_display_includes_code() {
        let error = ApiError::from(ErrorCode::StoreUnavailable);
        assert_eq!(error.to_string(), "StoreUnavailable: Service unavailable");
    }
}
