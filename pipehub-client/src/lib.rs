//! Pipehub HTTP Client
//!
//! A simple, type-safe HTTP client for the Pipehub registry API.
//!
//! # Example
//!
//! ```no_run
//! use pipehub_client::RegistryClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pipehub_client::ClientError> {
//!     let client = RegistryClient::new("http://localhost:3000");
//!
//!     let page = client.list_pipes(&Default::default()).await?;
//!     for pipe in page.pipes {
//!         println!("{} ({})", pipe.name, pipe.id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod pipes;
mod versions;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use pipehub_core::domain::{Pipe, PipeWithVersions, Version};
pub use pipehub_core::dto::pipe::RegisterVersion;
pub use pipes::ArchiveUpload;

use pipehub_core::dto::ApiResponse;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the Pipehub registry API
///
/// Methods are organized into logical groups:
/// - Pipe management (register, list, get, update, delete, download)
/// - Version management (create, list, get, update, delete, env schema)
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Base URL of the registry (e.g., "http://localhost:3000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl RegistryClient {
    /// Create a new registry client
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new registry client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the registry
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize a raw JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("{} responded {}", response.url(), status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Deserialize an enveloped response and unwrap its data payload
    async fn handle_envelope<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let envelope: ApiResponse<T> = self.handle_response(response).await?;
        envelope
            .data
            .ok_or_else(|| ClientError::ParseError("Response envelope carried no data".to_string()))
    }

    /// Check the status code of a response with no interesting body
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        tracing::debug!("{} responded {}", response.url(), status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }

    /// Check the status code and return the raw body bytes
    async fn handle_bytes(&self, response: reqwest::Response) -> Result<bytes::Bytes> {
        let status = response.status();
        tracing::debug!("{} responded {}", response.url(), status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RegistryClient::new("http://localhost:3000");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = RegistryClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = RegistryClient::with_client("http://localhost:3000", http_client);
        assert_eq!(client.base_url(), "http://localhost:3000");
    }
}
