//! Version DTOs

use serde::{Deserialize, Serialize};

use crate::domain::Version;

/// Request to create a version directly (no archive upload involved).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersion {
    pub pipe_id: i64,
    pub version_number: String,
    #[serde(default)]
    pub asset_url: Option<String>,
    pub env_schema: serde_json::Value,
}

/// Request to update a version. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVersion {
    pub version_number: Option<String>,
    pub asset_url: Option<String>,
    pub env_schema: Option<serde_json::Value>,
}

/// Query parameters accepted by the version listing endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub pipe_id: Option<i64>,
}

/// One page of a version listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionPage {
    pub items: Vec<Version>,
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}
