//! Pipe domain types

use serde::{Deserialize, Serialize};

use crate::domain::version::Version;

/// A named artifact package; the unit of versioning.
///
/// A pipe is created implicitly the first time a version is registered
/// under its name and owns every version registered afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipe {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A pipe together with its versions, as returned by listings that
/// request nested versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipeWithVersions {
    #[serde(flatten)]
    pub pipe: Pipe,
    pub versions: Vec<Version>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_serializes_camel_case() {
        let now = chrono::Utc::now();
        let pipe = Pipe {
            id: 1,
            name: "acme".to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&pipe).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_pipe_with_versions_flattens_pipe_fields() {
        let now = chrono::Utc::now();
        let pipe = Pipe {
            id: 7,
            name: "acme".to_string(),
            description: Some("demo".to_string()),
            created_at: now,
            updated_at: now,
        };
        let nested = PipeWithVersions {
            pipe,
            versions: vec![],
        };

        let value = serde_json::to_value(&nested).unwrap();
        assert_eq!(value.get("name").unwrap(), "acme");
        assert!(value.get("versions").unwrap().as_array().unwrap().is_empty());
    }
}
