//! Health check endpoints
//!
//! Kubernetes-compatible probes:
//! - /health - basic health check
//! - /health/ready - readiness probe (pings Postgres, reports the AI key state)
//! - /health/live - liveness probe (OK whenever the server is up)

use crate::ai::TextGenerator;
use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual readiness checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub ai: CheckStatus,
}

/// Status of an individual check
#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

/// Readiness probe; 503 when the database is unreachable
///
/// The AI key is reported but never gates readiness: the plan endpoints
/// answer 503 on their own until a key is configured, and the rest of the
/// service works without one.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = match db::ping(&state.db).await {
        Ok(latency) => CheckStatus {
            status: "healthy".to_string(),
            latency_ms: Some(latency.as_millis()),
            message: None,
        },
        Err(e) => CheckStatus {
            status: "unhealthy".to_string(),
            latency_ms: None,
            message: Some(e.to_string()),
        },
    };

    let ai = CheckStatus {
        status: if state.ai().is_configured() {
            "configured"
        } else {
            "not_configured"
        }
        .to_string(),
        latency_ms: None,
        message: None,
    };

    let is_ready = database.status == "healthy";

    let response = HealthResponse {
        status: if is_ready { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(HealthChecks { database, ai }),
    };

    if is_ready {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Liveness probe
pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "alive".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_healthy() {
        let response = health_check().await;
        assert_eq!(response.status, "healthy");
        assert!(!response.version.is_empty());
    }

    #[tokio::test]
    async fn test_liveness_check_returns_alive() {
        let response = liveness_check().await;
        assert_eq!(response.status, "alive");
    }
}
