//! Data Transfer Objects for the Pipehub HTTP API
//!
//! Everything that crosses the wire lives here so the server and the client
//! crate agree on one set of shapes. All payloads use camelCase field names.

pub mod pipe;
pub mod version;

use serde::{Deserialize, Serialize};

/// Standard response envelope returned by every JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying only data.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Successful response carrying data and a human-readable message.
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }
}

/// Health endpoint payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_omits_message() {
        let resp = ApiResponse::ok(42);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value.get("success").unwrap(), true);
        assert_eq!(value.get("data").unwrap(), 42);
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_with_message_envelope() {
        let resp = ApiResponse::with_message("payload", "created");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value.get("message").unwrap(), "created");
    }
}
