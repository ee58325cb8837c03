use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::history;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(history::list_history))
        .route("/:id", get(history::get_history))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(history::list_history))
        .route("/", post(history::create_history))
        .route("/:id", get(history::get_history))
        .route("/:id", put(history::update_history))
        .route("/:id", delete(history::delete_history))
}
