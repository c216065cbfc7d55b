//! Liveness of the relational store, shared by both front ends.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// State that can hand out the store connection
pub trait HasDb {
    fn db(&self) -> &DatabaseConnection;
}

pub async fn probe(db: &DatabaseConnection) -> HealthInfo {
    let status = match db.ping().await {
        Ok(_) => HealthStatus::Up,
        Err(e) => {
            error!("Database health check failed: {}", e);
            HealthStatus::Down
        }
    };
    HealthInfo {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    }
}

/// Basic health check endpoint
pub async fn health_check<S>(State(state): State<S>) -> impl IntoResponse
where
    S: HasDb + Clone + Send + Sync + 'static,
{
    debug!("Health check endpoint called");

    let health = probe(state.db()).await;
    let status_code = match health.status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Returns build and version information
pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn health_routes<S>() -> Router<S>
where
    S: HasDb + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check::<S>))
        .route("/health/version", get(version_info))
}
