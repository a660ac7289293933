use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::get_metrics;
use crate::startup::AppState;

/// Pings the store. 401 when the store rejected our credentials, 500 with the
/// store's message for any other failure.
pub async fn health_check(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "healthy",
                "database": "connected"
            })),
        )
            .into_response(),
        Err(e) if e.is_auth_failure() => {
            tracing::error!(error = %e, "Store health check failed: authentication");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "success": false,
                    "status": "unhealthy",
                    "error": "Authentication failed"
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Store health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "status": "unhealthy",
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}

/// Readiness probe: 200 when the store answers, 503 otherwise.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.store.ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
