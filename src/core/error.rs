// Centralized error handling for the HTTP layer and the importer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by request handlers and the auth gate
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied. No token provided.")]
    Unauthorized,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("User already registered.")]
    Conflict,

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::BAD_REQUEST,
            ApiError::Conflict => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(cause) = &self {
            tracing::error!(error = %format!("{:#}", cause), "Request failed");
        }

        (self.status(), self.to_string()).into_response()
    }
}

/// Errors raised while reading the import spreadsheet
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to open spreadsheet {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Spreadsheet {0} has no sheets")]
    NoSheet(PathBuf),

    #[error("Missing column '{0}' in header row")]
    MissingColumn(&'static str),

    #[error("Row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    async fn body_text(response: Response) -> String {
        let bytes = Body::new(response.into_body()).collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_unauthorized_and_invalid_token_differ() {
        let missing = ApiError::Unauthorized.into_response();
        let invalid = ApiError::InvalidToken.into_response();

        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(missing).await, "Access denied. No token provided.");
        assert_eq!(body_text(invalid).await, "Invalid token.");
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let response = ApiError::from(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Internal server error");
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = ApiError::InvalidArgument("unknown feature 'Z'".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "unknown feature 'Z'");
    }
}
