//! Pipe DTOs

use serde::{Deserialize, Serialize};

use crate::domain::{Pipe, Version};

/// Fields of the multipart registration form, minus the archive itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVersion {
    pub name: String,
    pub version_number: String,
    pub description: Option<String>,
    pub env_schema: serde_json::Value,
}

/// Request to create a pipe row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePipe {
    pub name: String,
    pub description: Option<String>,
}

/// Request to update a pipe. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePipe {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Query parameters accepted by the pipe listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub include_versions: Option<bool>,
}

/// Result of registering a version: the (possibly freshly created) pipe
/// and the new version row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredVersion {
    pub pipe: Pipe,
    pub version: Version,
}

/// One page of a pipe listing. `T` is either `Pipe` or `PipeWithVersions`
/// depending on whether nested versions were requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipePage<T> {
    pub pipes: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}
