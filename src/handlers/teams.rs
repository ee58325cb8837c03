use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use mongodb::{bson::doc, Collection};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    database::{crud, TEAMS},
    errors::Result,
    handlers::{created, with_message, AppJson},
    models::{
        admin::CurrentAdmin,
        parse_object_id, set_document,
        team::{CreateTeam, Team, UpdateTeam},
        to_api_json,
    },
    state::AppState,
};

fn collection(state: &AppState) -> Collection<Team> {
    state.db.collection(TEAMS)
}

pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Value>> {
    let teams = crud::list(&collection(&state), doc! {}, doc! { "name": 1 }).await?;
    tracing::debug!("Returning {} teams", teams.len());
    Ok(Json(to_api_json(&teams)?))
}

pub async fn get_team(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let id = parse_object_id("team id", &id)?;
    let team = crud::find_by_id(&collection(&state), id, "Team").await?;
    Ok(Json(to_api_json(&team)?))
}

pub async fn create_team(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<CreateTeam>,
) -> Result<(StatusCode, Json<Value>)> {
    payload.validate()?;

    let team = crud::insert(&collection(&state), &Team::from(payload), "Team").await?;
    tracing::info!("🏏 Team '{}' created by {}", team.name, admin.username);

    created("Team created successfully", "team", &team)
}

pub async fn update_team(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateTeam>,
) -> Result<Json<Value>> {
    payload.validate()?;
    let id = parse_object_id("team id", &id)?;

    let update = doc! { "$set": set_document(&payload)? };
    let team = crud::update_by_id(&collection(&state), id, update, "Team").await?;
    tracing::info!("✏️ Team {} updated by {}", id, admin.username);

    with_message("Team updated successfully", "team", &team)
}

pub async fn delete_team(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id("team id", &id)?;
    crud::delete_by_id(&collection(&state), id, "Team").await?;
    tracing::info!("🗑️ Team {} deleted by {}", id, admin.username);

    Ok(Json(json!({ "message": "Team deleted successfully" })))
}
