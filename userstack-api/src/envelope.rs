//! The `{data, message}` response envelope

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use userstack_core::ApiError;

/// Body of every users API response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A status code plus envelope, independent of the transport it is sent over
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub envelope: Envelope,
}

impl ApiResponse {
    pub fn data<T: Serialize>(status: StatusCode, data: &T) -> Self {
        Self {
            status,
            envelope: Envelope {
                data: Some(serde_json::to_value(data).unwrap_or(Value::Null)),
                message: None,
            },
        }
    }

    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            envelope: Envelope {
                data: None,
                message: Some(message.into()),
            },
        }
    }

    pub fn from_error(error: &ApiError) -> Self {
        let status =
            StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::message(status, error.message.clone())
    }

    pub fn body_string(&self) -> String {
        serde_json::to_string(&self.envelope).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userstack_core::ErrorCode;

    #[test]
    fn test_data_envelope_has_no_message() {
        let reply = ApiResponse::data(StatusCode::OK, &vec![1, 2, 3]);
        assert_eq!(reply.body_string(), r#"{"data":[1,2,3]}"#);
    }

    #[test]
    fn test_message_envelope_has_no_data() {
        let reply = ApiResponse::message(StatusCode::OK, "User abc deleted");
        assert_eq!(reply.body_string(), r#"{"message":"User abc deleted"}"#);
    }

    #[test]
    fn test_from_error() {
        let reply = ApiResponse::from_error(&ErrorCode::InvalidRequest.into());
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.envelope.message.as_deref(), Some("Invalid request"));
    }
}
