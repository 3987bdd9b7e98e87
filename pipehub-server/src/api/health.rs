//! Health Check API Handler
//!
//! Simple health check endpoint for monitoring.

use axum::Json;
use pipehub_core::dto::HealthStatus;

/// GET /health
/// Health check endpoint
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        success: true,
        message: "Pipehub registry is running".to_string(),
        timestamp: chrono::Utc::now(),
    })
}
