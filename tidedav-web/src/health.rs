//! Backend connectivity check, outside the WebDAV surface.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::warn;

use crate::server::AppState;

/// GET `/health` - pings the backend's echo endpoint.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.backend.ping().await {
        Ok(version) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "torrserver": version,
                "webdav_bridge": "running",
                "auth_enabled": state.config.auth_enabled(),
            })),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "Cannot connect to TorrServer",
                    "torrserver_url": state.config.backend_url,
                })),
            )
        }
    }
}
