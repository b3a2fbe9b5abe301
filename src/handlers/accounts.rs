use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::api::{Credentials, LoginResponse, RegisterResponse};
use axum::{extract::State, Json};
use std::sync::Arc;

/// Register a new account
///
/// POST /users  {"email": ..., "password": ...}
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Credentials>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let response = state.accounts.register(&body.email, &body.password).await?;
    Ok(Json(response))
}

/// Exchange credentials for a token
///
/// POST /auth  {"email": ..., "password": ...}
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Credentials>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.accounts.login(&body.email, &body.password).await?;
    Ok(Json(response))
}
