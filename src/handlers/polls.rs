use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use mongodb::{
    bson::{doc, DateTime as BsonDateTime, Document},
    Collection,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    database::{crud, populate::populated_pipeline, populate::TEAM_REFERENCE, POLLS},
    errors::{AppError, Result},
    handlers::{created, with_message, AppJson},
    models::{
        admin::CurrentAdmin,
        parse_object_id,
        poll::{CreatePoll, Poll, PollView, UpdatePoll, VoteRequest},
        set_document, to_api_json,
    },
    services::tally,
    state::AppState,
};

fn collection(state: &AppState) -> Collection<Poll> {
    state.db.collection(POLLS)
}

async fn populated(state: &AppState, filter: Document) -> Result<Vec<PollView>> {
    let raw: Collection<Document> = state.db.collection(POLLS);
    let pipeline = populated_pipeline(filter, Some(doc! { "createdAt": -1 }), &TEAM_REFERENCE);
    crud::aggregate(&raw, pipeline).await
}

pub async fn list_polls(State(state): State<AppState>) -> Result<Json<Value>> {
    let polls = populated(&state, doc! {}).await?;
    Ok(Json(to_api_json(&polls)?))
}

/// Active polls that have not expired.
pub async fn list_active_polls(State(state): State<AppState>) -> Result<Json<Value>> {
    let filter = doc! {
        "active": true,
        "$or": [
            { "expiresAt": { "$exists": false } },
            { "expiresAt": null },
            { "expiresAt": { "$gt": BsonDateTime::now() } },
        ],
    };
    let polls = populated(&state, filter).await?;
    tracing::debug!("{} active polls", polls.len());
    Ok(Json(to_api_json(&polls)?))
}

pub async fn get_poll(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let id = parse_object_id("poll id", &id)?;
    let poll = populated(&state, doc! { "_id": id })
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound("Poll"))?;
    Ok(Json(to_api_json(&poll)?))
}

pub async fn get_poll_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id("poll id", &id)?;
    let poll = state.polls.find(id).await?.ok_or(AppError::NotFound("Poll"))?;
    Ok(Json(to_api_json(&tally::results(&poll))?))
}

pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<VoteRequest>,
) -> Result<Json<Value>> {
    let id = parse_object_id("poll id", &id)?;
    let option_index = payload
        .option_index
        .ok_or_else(|| AppError::invalid_data("optionIndex is required"))?;

    let poll = tally::vote(state.polls.as_ref(), id, option_index).await?;
    Ok(Json(to_api_json(&poll)?))
}

pub async fn create_poll(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<CreatePoll>,
) -> Result<(StatusCode, Json<Value>)> {
    payload.validate()?;
    let poll = payload.into_poll()?;

    let poll = crud::insert(&collection(&state), &poll, "Poll").await?;
    tracing::info!("📊 Poll '{}' created by {}", poll.question, admin.username);

    created("Poll created successfully", "poll", &poll)
}

pub async fn update_poll(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdatePoll>,
) -> Result<Json<Value>> {
    payload.validate()?;
    let id = parse_object_id("poll id", &id)?;
    let patch = payload.into_patch()?;

    let mut set = set_document(&patch)?;
    // Polls carry no updatedAt.
    set.remove("updatedAt");
    if set.is_empty() {
        return Err(AppError::invalid_data("Nothing to update"));
    }

    let poll = crud::update_by_id(&collection(&state), id, doc! { "$set": set }, "Poll").await?;
    tracing::info!("✏️ Poll {} updated by {}", id, admin.username);

    with_message("Poll updated successfully", "poll", &poll)
}

pub async fn reset_votes(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id("poll id", &id)?;
    let poll = tally::reset_votes(state.polls.as_ref(), id).await?;
    tracing::info!("🔄 Poll {} reset by {}", id, admin.username);

    with_message("Poll votes reset successfully", "poll", &poll)
}

pub async fn delete_poll(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id("poll id", &id)?;
    crud::delete_by_id(&collection(&state), id, "Poll").await?;
    tracing::info!("🗑️ Poll {} deleted by {}", id, admin.username);

    Ok(Json(json!({ "message": "Poll deleted successfully" })))
}
