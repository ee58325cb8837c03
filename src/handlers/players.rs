use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    Collection,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    database::{crud, populate::populated_pipeline, populate::TEAM_REFERENCE, PLAYERS},
    errors::{AppError, Result},
    handlers::{created, with_message, AppJson},
    models::{
        admin::CurrentAdmin,
        parse_object_id,
        player::{CreatePlayer, Player, PlayerView, Statistics, UpdatePlayer},
        set_document, to_api_json,
    },
    state::AppState,
};

fn collection(state: &AppState) -> Collection<Player> {
    state.db.collection(PLAYERS)
}

async fn populated(state: &AppState, filter: Document) -> Result<Vec<PlayerView>> {
    let raw: Collection<Document> = state.db.collection(PLAYERS);
    let pipeline = populated_pipeline(filter, Some(doc! { "jerseyNumber": 1 }), &TEAM_REFERENCE);
    crud::aggregate(&raw, pipeline).await
}

async fn populated_one(state: &AppState, id: ObjectId) -> Result<PlayerView> {
    populated(state, doc! { "_id": id })
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound("Player"))
}

pub async fn list_players(State(state): State<AppState>) -> Result<Json<Value>> {
    let players = populated(&state, doc! {}).await?;
    Ok(Json(to_api_json(&players)?))
}

pub async fn list_team_players(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Value>> {
    let team_id = parse_object_id("team id", &team_id)?;
    let players = populated(&state, doc! { "teamId": team_id }).await?;
    tracing::debug!("Team {} has {} players", team_id, players.len());
    Ok(Json(to_api_json(&players)?))
}

pub async fn get_player(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let id = parse_object_id("player id", &id)?;
    let player = populated_one(&state, id).await?;
    Ok(Json(to_api_json(&player)?))
}

pub async fn create_player(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<CreatePlayer>,
) -> Result<(StatusCode, Json<Value>)> {
    payload.validate()?;
    let player = payload.into_player()?;

    let player = crud::insert(&collection(&state), &player, "Player").await?;
    tracing::info!("🧢 Player '{}' created by {}", player.name, admin.username);

    created("Player created successfully", "player", &player)
}

pub async fn update_player(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdatePlayer>,
) -> Result<Json<Value>> {
    payload.validate()?;
    let id = parse_object_id("player id", &id)?;
    let patch = payload.into_patch()?;

    let update = doc! { "$set": set_document(&patch)? };
    let player = crud::update_by_id(&collection(&state), id, update, "Player").await?;
    tracing::info!("✏️ Player {} updated by {}", id, admin.username);

    with_message("Player updated successfully", "player", &player)
}

/// Merges the posted statistics into the stored ones field by field.
pub async fn update_player_stats(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    AppJson(stats): AppJson<Statistics>,
) -> Result<Json<Value>> {
    let id = parse_object_id("player id", &id)?;

    // One `$set` per supplied field, so concurrent stat updates to other
    // fields are not overwritten.
    let mut set = Document::new();
    for (field, value) in bson::to_document(&stats)? {
        set.insert(format!("statistics.{}", field), value);
    }
    if set.is_empty() {
        return Err(AppError::invalid_data("No statistics supplied"));
    }
    set.insert("updatedAt", bson::DateTime::now());

    let player = crud::update_by_id(&collection(&state), id, doc! { "$set": set }, "Player").await?;
    tracing::info!("📊 Statistics for player {} updated by {}", id, admin.username);

    with_message("Player statistics updated successfully", "player", &player)
}

pub async fn delete_player(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id("player id", &id)?;
    crud::delete_by_id(&collection(&state), id, "Player").await?;
    tracing::info!("🗑️ Player {} deleted by {}", id, admin.username);

    Ok(Json(json!({ "message": "Player deleted successfully" })))
}
