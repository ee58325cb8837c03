use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::admin_auth;
use crate::state::AppState;

/// Reachable without a token.
pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login", post(admin_auth::login))
}

/// Mounted behind `require_admin`.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(admin_auth::me))
        .route("/register", post(admin_auth::register))
}
