//! Version-related API endpoints

use crate::RegistryClient;
use crate::error::Result;
use pipehub_core::domain::version::Version;
use pipehub_core::dto::HealthStatus;
use pipehub_core::dto::version::{CreateVersion, UpdateVersion, VersionListQuery, VersionPage};

impl RegistryClient {
    // =============================================================================
    // Version Management
    // =============================================================================

    /// Create a version under an existing pipe
    pub async fn create_version(&self, req: &CreateVersion) -> Result<Version> {
        let url = format!("{}/versions", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_envelope(response).await
    }

    /// List versions with pagination and optional pipe filter
    pub async fn list_versions(&self, query: &VersionListQuery) -> Result<VersionPage> {
        let url = format!("{}/versions", self.base_url);
        let response = self.client.get(&url).query(query).send().await?;

        self.handle_envelope(response).await
    }

    /// Get a version by ID
    pub async fn get_version(&self, id: i64) -> Result<Version> {
        let url = format!("{}/versions/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }

    /// Update a version
    pub async fn update_version(&self, id: i64, req: &UpdateVersion) -> Result<Version> {
        let url = format!("{}/versions/{}", self.base_url, id);
        let response = self.client.put(&url).json(req).send().await?;

        self.handle_envelope(response).await
    }

    /// Delete a version
    pub async fn delete_version(&self, id: i64) -> Result<()> {
        let url = format!("{}/versions/{}", self.base_url, id);
        let response = self.client.delete(&url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Fetch the stored envSchema document for a pipe version
    pub async fn env_schema(&self, name: &str, version: &str) -> Result<serde_json::Value> {
        let url = format!("{}/versions/{}/env-schema/{}", self.base_url, name, version);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Check registry health
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
