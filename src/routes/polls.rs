use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::polls;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(polls::list_polls))
        .route("/active", get(polls::list_active_polls))
        .route("/:id", get(polls::get_poll))
        .route("/:id/results", get(polls::get_poll_results))
        .route("/:id/vote", post(polls::vote))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(polls::list_polls))
        .route("/", post(polls::create_poll))
        .route("/:id", get(polls::get_poll))
        .route("/:id", put(polls::update_poll))
        .route("/:id", delete(polls::delete_poll))
        .route("/:id/reset-votes", put(polls::reset_votes))
}
