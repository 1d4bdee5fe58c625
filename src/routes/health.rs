//! Health check endpoints for container orchestration.
//!
//! `/health` is a liveness probe: it only checks that the process can respond
//! to HTTP. `/health/db` probes PostgreSQL connectivity and always answers 200;
//! degradation is reported through the payload's `status` field so
//! orchestrators can always parse the body.

use axum::{extract::State, Json};

use crate::health::{liveness, probe, HealthReport, LivenessReport};
use crate::state::AppState;

/// Liveness handler.
pub async fn health() -> Json<LivenessReport> {
    Json(liveness())
}

/// Database connectivity handler.
pub async fn health_db(State(state): State<AppState>) -> Json<HealthReport> {
    Json(probe(state.db.as_ref(), &state.config.database).await)
}
