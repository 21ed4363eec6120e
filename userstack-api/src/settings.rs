//! Behaviour switches for the users API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use userstack_core::{ApiError, ErrorCode};

use crate::handlers::HandlerError;

/// Where a created record's `name`/`email` come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreateMode {
    /// Persist the values supplied in the request body
    #[default]
    FromBody,
    /// Ignore the body values and generate placeholders
    Placeholder,
}

/// How handler failures are turned into responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorMapping {
    /// Each failure kind keeps its own status code
    #[default]
    Typed,
    /// Every failure becomes 404 "User not found"
    CatchAll,
}

/// Settings shared by every request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub create_mode: CreateMode,
    pub error_mapping: ErrorMapping,
    /// Prefix stripped before routing, e.g. an API Gateway stage (`/prod`)
    pub base_path: Option<String>,
}

impl ErrorMapping {
    pub fn to_api_error(self, err: &HandlerError) -> ApiError {
        match (self, err) {
            (Self::CatchAll, _) => ErrorCode::UserNotFound.into(),
            (Self::Typed, HandlerError::InvalidInput(message)) => {
                ApiError::new(ErrorCode::InvalidInput, message.clone())
            }
            (Self::Typed, err) => err.code().into(),
        }
    }
}

impl FromStr for CreateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "from-body" | "from_body" | "body" => Ok(Self::FromBody),
            "placeholder" | "generated" => Ok(Self::Placeholder),
            other => Err(format!("unknown create mode '{other}'")),
        }
    }
}

impl FromStr for ErrorMapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "typed" => Ok(Self::Typed),
            "catch-all" | "catch_all" | "legacy" => Ok(Self::CatchAll),
            other => Err(format!("unknown error mapping '{other}'")),
        }
    }
}

impl fmt::Display for CreateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FromBody => "from-body",
            Self::Placeholder => "placeholder",
        })
    }
}

impl fmt::Display for ErrorMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Typed => "typed",
            Self::CatchAll => "catch-all",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("placeholder".parse(), Ok(CreateMode::Placeholder));
        assert_eq!("FROM-BODY".parse(), Ok(CreateMode::FromBody));
        assert_eq!("legacy".parse(), Ok(ErrorMapping::CatchAll));
        assert_eq!("typed".parse(), Ok(ErrorMapping::Typed));
        assert!("strict".parse::<ErrorMapping>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for mode in [CreateMode::FromBody, CreateMode::Placeholder] {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
        for mapping in [ErrorMapping::Typed, ErrorMapping::CatchAll] {
            assert_eq!(mapping.to_string().parse(), Ok(mapping));
        }
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: ApiSettings =
            serde_json::from_str(r#"{"error_mapping": "catch-all"}"#).unwrap();
        assert_eq!(settings.error_mapping, ErrorMapping::CatchAll);
        assert_eq!(settings.create_mode, CreateMode::FromBody);
        assert_eq!(settings.base_path, None);
    }

    #[test]
    fn test_typed_mapping() {
        let mapping = ErrorMapping::Typed;

        let err = mapping.to_api_error(&HandlerError::InvalidInput("bad json".to_string()));
        assert_eq!((err.http_status(), err.message.as_str()), (400, "bad json"));

        let err = mapping.to_api_error(&HandlerError::StoreUnavailable("timeout".to_string()));
        assert_eq!((err.http_status(), err.message.as_str()), (503, "Service unavailable"));

        let err = mapping.to_api_error(&HandlerError::NotFound("abc".to_string()));
        assert_eq!((err.http_status(), err.message.as_str()), (404, "User not found"));
    }

    #[test]
    fn test_catch_all_mapping() {
        for err in [
            HandlerError::InvalidInput("bad json".to_string()),
            HandlerError::StoreUnavailable("timeout".to_string()),
            HandlerError::NotFound("abc".to_string()),
        ] {
            let api_error = ErrorMapping::CatchAll.to_api_error(&err);
            assert_eq!(api_error.http_status(), 404);
            assert_eq!(api_error.message, "User not found");
        }
    }
}
