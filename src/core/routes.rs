// HTTP routes configuration

use crate::auth::middleware::conditional_auth;
use crate::core::state::AppState;
use crate::handlers::{accounts, fallback, health, stats};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Public endpoints
        .route("/", get(health::root_handler))
        .route("/feature-trend/{feature}", get(stats::feature_trend_handler))

        // Token required only when filters are present
        .route(
            "/totalTimeSpent",
            get(stats::total_time_spent_handler).route_layer(middleware::from_fn_with_state(
                Arc::clone(&state),
                conditional_auth,
            )),
        )

        // Accounts
        .route("/users", post(accounts::register_handler))
        .route("/auth", post(accounts::login_handler))

        .fallback(fallback::fallback_handler)
        .layer(cors)
        .with_state(state)
}
