use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

pub async fn fallback_handler(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("Cannot find {}", uri.path()),
    )
        .into_response()
}
