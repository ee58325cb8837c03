use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::teams;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::list_teams))
        .route("/:id", get(teams::get_team))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::list_teams))
        .route("/", post(teams::create_team))
        .route("/:id", get(teams::get_team))
        .route("/:id", put(teams::update_team))
        .route("/:id", delete(teams::delete_team))
}
