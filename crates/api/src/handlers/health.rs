use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health
///
/// Reports whether the database is reachable.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match survey_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "connected",
                version: env!("CARGO_PKG_VERSION"),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "unhealthy",
                    database: "disconnected",
                    version: env!("CARGO_PKG_VERSION"),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
