//! API Gateway HTTP API (payload format 2.0) adapter

use axum::http::Method;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info_span, Instrument};
use userstack_core::{ErrorCode, RequestId};

use crate::envelope::ApiResponse;
use crate::handlers::HandlerError;
use crate::http::REQUEST_ID_HEADER;
use crate::router::UsersRouter;
use crate::routes::{normalize_path, resolve};

/// Incoming HTTP API proxy event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiEvent {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub route_key: String,
    #[serde(default)]
    pub raw_path: String,
    #[serde(default)]
    pub raw_query_string: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub request_context: HttpApiRequestContext,
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiRequestContext {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub api_id: String,
    pub request_id: Option<String>,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub time_epoch: i64,
    pub http: HttpApiRequestDescription,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiRequestDescription {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub source_ip: String,
    #[serde(default)]
    pub user_agent: String,
}

/// Structured proxy response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiResponse {
    pub status_code: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl HttpApiEvent {
    /// Request body bytes, base64-decoded when the gateway encoded them
    pub fn decoded_body(&self) -> Result<Vec<u8>, HandlerError> {
        match (&self.body, self.is_base64_encoded) {
            (None, _) => Ok(Vec::new()),
            (Some(body), false) => Ok(body.clone().into_bytes()),
            (Some(body), true) => STANDARD
                .decode(body)
                .map_err(|e| HandlerError::InvalidInput(format!("Invalid base64 body: {e}"))),
        }
    }
}

/// Run one gateway event through the users router
pub async fn handle_event(router: &UsersRouter, event: HttpApiEvent) -> HttpApiResponse {
    let request_id = RequestId::from_upstream(event.request_context.request_id.as_deref());
    let span = info_span!("users", request_id = %request_id);

    let reply = async {
        let Ok(method) = Method::from_bytes(event.request_context.http.method.as_bytes()) else {
            return ApiResponse::from_error(&ErrorCode::InvalidRequest.into());
        };
        match event.decoded_body() {
            Ok(body) => {
                router
                    .dispatch(&method, &event.request_context.http.path, &body)
                    .await
            }
            // A bad body only matters once the path names an operation
            Err(err) => {
                let path = normalize_path(
                    &event.request_context.http.path,
                    router.settings().base_path.as_deref(),
                );
                match resolve(&method, path) {
                    Ok(_) => router.reject(&err),
                    Err(routing) => ApiResponse::from_error(&routing),
                }
            }
        }
    }
    .instrument(span)
    .await;

    HttpApiResponse {
        status_code: reply.status.as_u16(),
        headers: HashMap::from([
            ("content-type".to_string(), "application/json".to_string()),
            (REQUEST_ID_HEADER.to_string(), request_id.to_string()),
        ]),
        body: reply.body_string(),
        is_base64_encoded: false,
    }
}
