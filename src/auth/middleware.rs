use crate::auth::policy::requires_auth;
use crate::auth::token::TokenClaims;
use crate::core::error::ApiError;
use crate::core::state::AppState;
use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Header carrying the bearer token
pub const AUTH_HEADER: &str = "x-auth-token";

/// Decoded token of the caller, present on requests that passed the gate
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// Require a valid token only when the request carries filter parameters
pub async fn conditional_auth(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !requires_auth(&params) {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get(AUTH_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            warn!(path = %request.uri().path(), "Filtered request without token");
            ApiError::Unauthorized
        })?;

    let claims = state.tokens.verify(token).inspect_err(|_| {
        warn!(path = %request.uri().path(), "Filtered request with invalid token");
    })?;

    request.extensions_mut().insert(AuthenticatedUser(claims));
    Ok(next.run(request).await)
}
