//! axum HTTP surface

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info_span, Instrument};
use userstack_core::RequestId;

use crate::envelope::ApiResponse;
use crate::router::UsersRouter;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the HTTP application: `/health` plus every other path through the users router
pub fn create_app(router: UsersRouter, cors: bool) -> Router {
    let app = Router::new()
        // Other methods on /health resolve like any non-users path
        .route("/health", get(health_check).fallback(handle_request))
        .fallback(handle_request)
        .layer(TraceLayer::new_for_http())
        .with_state(router);

    if cors {
        // Same preflight policy the HTTP API was deployed with
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "running" })))
}

async fn handle_request(
    State(router): State<UsersRouter>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = RequestId::from_upstream(
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
    );
    let span = info_span!("users", request_id = %request_id);

    let reply = router
        .dispatch(&method, uri.path(), &body)
        .instrument(span)
        .await;

    into_http_response(reply, &request_id)
}

pub fn into_http_response(reply: ApiResponse, request_id: &RequestId) -> Response {
    let mut response = (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body_string(),
    )
        .into_response();

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
