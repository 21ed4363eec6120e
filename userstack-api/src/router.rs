//! Request router for the users resource

use axum::http::Method;
use std::sync::Arc;
use tracing::{info, warn};
use userstack_store::RecordStore;

use crate::envelope::ApiResponse;
use crate::handlers::{self, HandlerError};
use crate::routes::{normalize_path, resolve, Route};
use crate::settings::ApiSettings;

/// Dispatches requests to the user handlers
///
/// Holds no per-request state; cloning shares the store handle.
#[derive(Clone)]
pub struct UsersRouter {
    store: Arc<dyn RecordStore>,
    settings: Arc<ApiSettings>,
}

impl UsersRouter {
    pub fn new(store: Arc<dyn RecordStore>, settings: ApiSettings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Route and run one request. Never fails: routing mismatches and handler
    /// errors both come back as envelope responses.
    pub async fn dispatch(&self, method: &Method, path: &str, body: &[u8]) -> ApiResponse {
        let path = normalize_path(path, self.settings.base_path.as_deref());

        let route = match resolve(method, path) {
            Ok(route) => route,
            Err(err) => {
                warn!(method = %method, path = %path, error = %err, "Unmatched users request");
                return ApiResponse::from_error(&err);
            }
        };

        info!(method = %method, path = %path, operation = route.name(), "Users request");

        match self.execute(route, body).await {
            Ok(reply) => reply,
            Err(err) => self.reject(&err),
        }
    }

    /// Turn a handler failure into a response per the configured error mapping
    pub fn reject(&self, err: &HandlerError) -> ApiResponse {
        warn!(error = %err, mapping = %self.settings.error_mapping, "Users request failed");
        ApiResponse::from_error(&self.settings.error_mapping.to_api_error(err))
    }

    async fn execute(&self, route: Route, body: &[u8]) -> Result<ApiResponse, HandlerError> {
        let store = self.store.as_ref();
        match route {
            Route::ListUsers => handlers::list_users(store).await,
            Route::CreateUser => {
                handlers::create_user(store, body, self.settings.create_mode).await
            }
            Route::GetUser(id) => handlers::get_user(store, &id).await,
            Route::UpdateUser(id) => handlers::update_user(store, &id, body).await,
            Route::DeleteUser(id) => handlers::delete_user(store, &id).await,
        }
    }
}
