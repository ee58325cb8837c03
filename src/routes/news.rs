use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::news;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(news::list_news))
        .route("/team/:team_id", get(news::list_team_news))
        .route("/:id", get(news::get_news))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(news::list_news))
        .route("/", post(news::create_news))
        .route("/:id", put(news::update_news))
        .route("/:id", delete(news::delete_news))
}
