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
    database::{crud, HISTORY},
    errors::Result,
    handlers::{created, with_message, AppJson},
    models::{
        admin::CurrentAdmin,
        history::{CreateHistory, History, UpdateHistory},
        parse_object_id, set_document, to_api_json,
    },
    state::AppState,
};

fn collection(state: &AppState) -> Collection<History> {
    state.db.collection(HISTORY)
}

pub async fn list_history(State(state): State<AppState>) -> Result<Json<Value>> {
    let entries = crud::list(&collection(&state), doc! {}, doc! { "year": -1 }).await?;
    Ok(Json(to_api_json(&entries)?))
}

pub async fn get_history(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let id = parse_object_id("history id", &id)?;
    let entry = crud::find_by_id(&collection(&state), id, "History entry").await?;
    Ok(Json(to_api_json(&entry)?))
}

pub async fn create_history(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<CreateHistory>,
) -> Result<(StatusCode, Json<Value>)> {
    payload.validate()?;
    let entry = payload.into_history()?;

    let entry = crud::insert(&collection(&state), &entry, "History entry").await?;
    tracing::info!("🏆 History '{}' ({}) added by {}", entry.title, entry.year, admin.username);

    created("History created successfully", "history", &entry)
}

pub async fn update_history(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateHistory>,
) -> Result<Json<Value>> {
    payload.validate()?;
    let id = parse_object_id("history id", &id)?;
    let patch = payload.into_patch()?;

    let update = doc! { "$set": set_document(&patch)? };
    let entry = crud::update_by_id(&collection(&state), id, update, "History entry").await?;
    tracing::info!("✏️ History {} updated by {}", id, admin.username);

    with_message("History updated successfully", "history", &entry)
}

pub async fn delete_history(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id("history id", &id)?;
    crud::delete_by_id(&collection(&state), id, "History entry").await?;
    tracing::info!("🗑️ History {} deleted by {}", id, admin.username);

    Ok(Json(json!({ "message": "History deleted successfully" })))
}
