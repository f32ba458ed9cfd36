//! Health check handlers

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::{repository::PhoneRepository, state::AppState};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe. Always 200 while the process is serving.
pub async fn health<R: PhoneRepository>(State(state): State<AppState<R>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness probe.
///
/// Pings the phone store; 503 when it does not answer.
pub async fn readiness<R: PhoneRepository>(
    State(state): State<AppState<R>>,
) -> impl IntoResponse {
    let store = state.repository();

    let status = match store.ping().await {
        Ok(()) => DependencyStatus {
            healthy: true,
            message: Some("Connected".to_string()),
        },
        Err(e) => {
            tracing::error!(backend = store.backend(), "Store health check failed: {}", e);
            DependencyStatus {
                healthy: false,
                message: Some(format!("Connection failed: {}", e.message)),
            }
        }
    };

    let ready = status.healthy;
    let mut dependencies = HashMap::new();
    dependencies.insert(store.backend().to_string(), status);

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::repository::MemoryPhoneRepository;

    #[tokio::test]
    async fn test_readiness_reports_store() {
        let state = AppState::new(MemoryPhoneRepository::new(), Config::default());
        let response = readiness(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body: ReadinessResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(body.ready);
        assert_eq!(body.service, "phone-inventory");
        assert!(body.dependencies["memory"].healthy);
    }

    #[tokio::test]
    async fn test_health_reports_version() {
        let state = AppState::new(MemoryPhoneRepository::new(), Config::default());
        let response = health(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.version.as_deref(), Some(env!("CARGO_PKG_VERSION")));
    }
}
