use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{cricket_matches, matches};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(matches::list_matches))
        .route("/team/:team_id", get(matches::list_team_matches))
        .route("/:id", get(matches::get_match))
        .route("/:id/current", get(matches::get_current_match))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(matches::list_matches))
        .route("/", post(matches::create_match))
        .route("/:id", get(matches::get_match))
        .route("/:id", put(matches::update_match))
        .route("/:id", delete(matches::delete_match))
}

/// Live-score feed proxy and publish, admin only.
pub fn cricket_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cricket_matches::list_current))
        .route("/publish", post(cricket_matches::publish))
}
