//! Pipe-related API endpoints

use crate::RegistryClient;
use crate::error::{ClientError, Result};
use pipehub_core::domain::pipe::{Pipe, PipeWithVersions};
use pipehub_core::domain::version::Version;
use pipehub_core::dto::pipe::{
    PipeListQuery, PipePage, RegisterVersion, RegisteredVersion, UpdatePipe,
};
use reqwest::multipart::{Form, Part};

/// An archive payload for registration uploads.
#[derive(Debug, Clone)]
pub struct ArchiveUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl RegistryClient {
    // =============================================================================
    // Pipe Management
    // =============================================================================

    /// Register a version under a pipe name, uploading its archive.
    ///
    /// The pipe is created by the server when no pipe of that name exists
    /// yet; otherwise the version is attached to the existing pipe.
    pub async fn register_version(
        &self,
        req: &RegisterVersion,
        archive: ArchiveUpload,
    ) -> Result<RegisteredVersion> {
        let env_schema = serde_json::to_string(&req.env_schema)
            .map_err(|e| ClientError::ParseError(format!("Failed to encode envSchema: {}", e)))?;

        let mut form = Form::new()
            .text("name", req.name.clone())
            .text("version", req.version_number.clone())
            .text("envSchema", env_schema);

        if let Some(description) = &req.description {
            form = form.text("description", description.clone());
        }

        tracing::debug!(
            "Registering {} {} ({} bytes)",
            req.name,
            req.version_number,
            archive.bytes.len()
        );

        let part = Part::bytes(archive.bytes)
            .file_name(archive.file_name)
            .mime_str("application/x-tar")?;
        form = form.part("file", part);

        let url = format!("{}/pipes", self.base_url);
        let response = self.client.post(&url).multipart(form).send().await?;

        self.handle_envelope(response).await
    }

    /// List pipes with pagination and optional search
    pub async fn list_pipes(&self, query: &PipeListQuery) -> Result<PipePage<Pipe>> {
        let url = format!("{}/pipes", self.base_url);
        let response = self.client.get(&url).query(query).send().await?;

        self.handle_envelope(response).await
    }

    /// List pipes with their versions nested
    pub async fn list_pipes_with_versions(
        &self,
        query: &PipeListQuery,
    ) -> Result<PipePage<PipeWithVersions>> {
        let url = format!("{}/pipes", self.base_url);
        let query = PipeListQuery {
            include_versions: Some(true),
            ..query.clone()
        };
        let response = self.client.get(&url).query(&query).send().await?;

        self.handle_envelope(response).await
    }

    /// Get a pipe by ID
    pub async fn get_pipe(&self, id: i64) -> Result<Pipe> {
        let url = format!("{}/pipes/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }

    /// Update a pipe
    pub async fn update_pipe(&self, id: i64, req: &UpdatePipe) -> Result<Pipe> {
        let url = format!("{}/pipes/{}", self.base_url, id);
        let response = self.client.put(&url).json(req).send().await?;

        self.handle_envelope(response).await
    }

    /// Delete a pipe and all of its versions
    pub async fn delete_pipe(&self, id: i64) -> Result<()> {
        let url = format!("{}/pipes/{}", self.base_url, id);
        let response = self.client.delete(&url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Download the archive of a pipe version.
    ///
    /// Without a version number the most recently created version is
    /// downloaded.
    pub async fn download(&self, name: &str, version: Option<&str>) -> Result<bytes::Bytes> {
        let url = match version {
            Some(version) => format!("{}/pipes/{}/download/{}", self.base_url, name, version),
            None => format!("{}/pipes/{}/download", self.base_url, name),
        };
        tracing::debug!("Downloading {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_bytes(response).await
    }

    /// List all versions of a pipe
    pub async fn versions_for_pipe(&self, pipe_id: i64) -> Result<Vec<Version>> {
        let url = format!("{}/pipes/{}/versions", self.base_url, pipe_id);
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }

    /// Get the most recently created version of a pipe
    pub async fn latest_version(&self, pipe_id: i64) -> Result<Version> {
        let url = format!("{}/pipes/{}/versions/latest", self.base_url, pipe_id);
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }
}
