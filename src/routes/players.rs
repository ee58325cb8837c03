use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::players;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(players::list_players))
        .route("/team/:team_id", get(players::list_team_players))
        .route("/:id", get(players::get_player))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(players::list_players))
        .route("/", post(players::create_player))
        .route("/:id", get(players::get_player))
        .route("/:id", put(players::update_player))
        .route("/:id", delete(players::delete_player))
        .route("/:id/stats", put(players::update_player_stats))
}
