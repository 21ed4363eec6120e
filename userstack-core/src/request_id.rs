//! Request ID generation

use uuid::Uuid;

/// Per-invocation request id, echoed in the `x-request-id` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId {
    pub id: String,
}

impl RequestId {
    /// Generate a new request id
    pub fn new() -> Self {
        let id = Uuid::new_v4().simple().to_string().to_uppercase();
        Self { id }
    }

    /// Create a request id with a specific value (for testing, or to reuse an upstream id)
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Reuse the id an upstream gateway assigned, or generate one
    pub fn from_upstream(upstream: Option<&str>) -> Self {
        match upstream.map(str::trim) {
            Some(id) if !id.is_empty() => Self::with_id(id),
            _ => Self::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}
