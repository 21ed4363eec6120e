//! Core types for userstack
//!
//! This crate provides the error taxonomy and request ids used across the
//! store, API and server crates.

pub mod error;
pub mod request_id;

pub use error::{ApiError, ErrorCode};
pub use request_id::RequestId;
