use axum::{http::StatusCode, response::IntoResponse};

/// Liveness check
///
/// GET /
pub async fn root_handler() -> impl IntoResponse {
    (StatusCode::OK, "Server is running")
}
