//! Version domain types

use serde::{Deserialize, Serialize};

/// One immutable, uniquely-numbered release of a pipe.
///
/// `asset_url` is the public URL of the uploaded archive, or the empty
/// string when no archive was uploaded for this version. `env_schema` is an
/// opaque document describing the environment variables the release
/// expects; it is stored and returned verbatim, never interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: i64,
    pub pipe_id: i64,
    pub version_number: String,
    pub asset_url: String,
    pub env_schema: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Version {
    /// Whether an archive was uploaded for this version.
    pub fn has_asset(&self) -> bool {
        !self.asset_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_serializes_camel_case() {
        let now = chrono::Utc::now();
        let version = Version {
            id: 1,
            pipe_id: 2,
            version_number: "1.0.0".to_string(),
            asset_url: String::new(),
            env_schema: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&version).unwrap();
        assert!(value.get("pipeId").is_some());
        assert!(value.get("versionNumber").is_some());
        assert!(value.get("assetUrl").is_some());
        assert!(value.get("envSchema").is_some());
    }

    #[test]
    fn test_has_asset() {
        let now = chrono::Utc::now();
        let mut version = Version {
            id: 1,
            pipe_id: 2,
            version_number: "1.0.0".to_string(),
            asset_url: String::new(),
            env_schema: serde_json::json!({}),
            created_at: now,
            updated_at: now,
        };
        assert!(!version.has_asset());

        version.asset_url = "http://localhost:3000/files/acme-1.0.0.tar".to_string();
        assert!(version.has_asset());
    }
}
