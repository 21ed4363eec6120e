//! The five user operations

use axum::http::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;
use userstack_core::ErrorCode;
use userstack_store::{NewUser, RecordStore, StoreError, User, UserUpdate};

use crate::envelope::ApiResponse;
use crate::settings::CreateMode;

/// Failures a handler reports to the router
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl HandlerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::UserNotFound,
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            // A record the store cannot decode is a backend fault, not a caller mistake
            err @ (StoreError::Unavailable(_) | StoreError::MalformedRecord { .. }) => {
                Self::StoreUnavailable(err.to_string())
            }
        }
    }
}

// === Request types ===

#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct UpdateUserRequest {
    name: Option<String>,
    email: Option<String>,
}

// === Handlers ===

pub async fn list_users(store: &dyn RecordStore) -> Result<ApiResponse, HandlerError> {
    let users = store.list().await?;
    Ok(ApiResponse::data(StatusCode::OK, &users))
}

pub async fn create_user(
    store: &dyn RecordStore,
    body: &[u8],
    mode: CreateMode,
) -> Result<ApiResponse, HandlerError> {
    let new_user = match mode {
        CreateMode::FromBody => {
            let req: CreateUserRequest = parse_body(body)?;
            NewUser::new(req.name, req.email)
        }
        CreateMode::Placeholder => {
            if !body.is_empty() {
                parse_body::<serde_json::Value>(body)?;
            }
            NewUser::placeholder()
        }
    };

    let user = User::create(new_user);
    store.put(user.clone()).await?;

    info!(id = %user.id, "Created user");
    Ok(ApiResponse::data(StatusCode::CREATED, &user))
}

pub async fn get_user(store: &dyn RecordStore, id: &str) -> Result<ApiResponse, HandlerError> {
    let user = store
        .get(id)
        .await?
        .ok_or_else(|| HandlerError::NotFound(id.to_string()))?;
    Ok(ApiResponse::data(StatusCode::OK, &user))
}

/// Absent fields are cleared, not kept: `{}` nulls both `name` and `email`
pub async fn update_user(
    store: &dyn RecordStore,
    id: &str,
    body: &[u8],
) -> Result<ApiResponse, HandlerError> {
    let req: UpdateUserRequest = parse_body(body)?;
    let user = store
        .update(
            id,
            UserUpdate {
                name: req.name,
                email: req.email,
            },
        )
        .await?;

    info!(id = %id, "Updated user");
    Ok(ApiResponse::data(StatusCode::OK, &user))
}

pub async fn delete_user(store: &dyn RecordStore, id: &str) -> Result<ApiResponse, HandlerError> {
    store.delete(id).await?;

    info!(id = %id, "Deleted user");
    Ok(ApiResponse::message(
        StatusCode::OK,
        format!("User {id} deleted"),
    ))
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, HandlerError> {
    if body.is_empty() {
        return Err(HandlerError::InvalidInput("Missing request body".to_string()));
    }
    serde_json::from_slice(body).map_err(|e| HandlerError::InvalidInput(format!("Invalid JSON: {e}")))
}
