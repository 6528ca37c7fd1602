//! Liveness and readiness check for load balancers.
//!
//! Answers 503 while the database is unreachable so the instance is taken
//! out of rotation; every favorites and search route needs it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use planboard_core::entity::EntityKind;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    /// `up` or `down`.
    pub database: &'static str,
    /// Kind tags accepted by the favorites and search routes.
    pub entity_kinds: Vec<&'static str>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = match planboard_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            false
        }
    };

    let (code, status, database) = if database_up {
        (StatusCode::OK, "ok", "up")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        entity_kinds: EntityKind::ALL.iter().map(|kind| kind.as_str()).collect(),
    };

    (code, Json(body))
}

/// Mount health check routes (root-level, outside `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
