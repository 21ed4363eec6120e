//! Route resolution for the users resource

use axum::http::Method;
use percent_encoding::percent_decode_str;
use userstack_core::{ApiError, ErrorCode};

const COLLECTION: &str = "/users";
const ITEM_PREFIX: &str = "/users/";

/// One of the five user operations, with its path id where it has one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ListUsers,
    CreateUser,
    GetUser(String),
    UpdateUser(String),
    DeleteUser(String),
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListUsers => "ListUsers",
            Self::CreateUser => "CreateUser",
            Self::GetUser(_) => "GetUser",
            Self::UpdateUser(_) => "UpdateUser",
            Self::DeleteUser(_) => "DeleteUser",
        }
    }
}

/// Pick the operation for a normalized path
///
/// `/users` accepts GET and POST; `/users/{id}` accepts GET, PUT and DELETE.
/// Anything else under those paths is "Path not found", an empty id is
/// "User id not found", and every other path is "Invalid request".
pub fn resolve(method: &Method, path: &str) -> Result<Route, ApiError> {
    if path == COLLECTION {
        return match *method {
            Method::GET => Ok(Route::ListUsers),
            Method::POST => Ok(Route::CreateUser),
            _ => Err(ErrorCode::PathNotFound.into()),
        };
    }

    if let Some(raw_id) = path.strip_prefix(ITEM_PREFIX) {
        let id = decode_id(raw_id).ok_or_else(|| ApiError::from(ErrorCode::MissingUserId))?;
        return match *method {
            Method::GET => Ok(Route::GetUser(id)),
            Method::PUT => Ok(Route::UpdateUser(id)),
            Method::DELETE => Ok(Route::DeleteUser(id)),
            _ => Err(ErrorCode::PathNotFound.into()),
        };
    }

    Err(ErrorCode::InvalidRequest.into())
}

/// Drop the query string and the configured base path
pub fn normalize_path<'a>(raw: &'a str, base_path: Option<&str>) -> &'a str {
    let path = raw.split_once('?').map_or(raw, |(path, _)| path);

    let Some(base) = base_path.map(|b| b.trim_end_matches('/')).filter(|b| !b.is_empty()) else {
        return path;
    };

    match path.strip_prefix(base) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

fn decode_id(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|id| id.into_owned())
}
