use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::observability::MetricsSnapshot;

use crate::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub producer: ServiceStatus,
    pub topic: String,
    pub metrics: MetricsSnapshot,
}

/// Liveness plus vote pipeline counters. A missing producer only degrades
/// the service: the ballot page keeps working.
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let producer = if state.publisher.is_available() {
        ServiceStatus::Healthy
    } else {
        ServiceStatus::Unhealthy
    };

    let status = match producer {
        ServiceStatus::Healthy => ServiceStatus::Healthy,
        _ => ServiceStatus::Degraded,
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        producer,
        topic: state.publisher.topic().to_string(),
        metrics: state.metrics.snapshot(),
    })
}
