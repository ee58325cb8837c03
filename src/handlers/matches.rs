use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection,
};
use serde_json::{json, Value};

use crate::{
    database::{crud, populate::populated_pipeline, populate::MATCH_REFERENCES, MATCHES},
    errors::{AppError, Result},
    handlers::{created, with_message, AppJson},
    models::{
        admin::CurrentAdmin,
        matches::{CreateMatch, Match, MatchView, UpdateMatch},
        parse_object_id, set_document, to_api_json,
    },
    state::AppState,
};

fn collection(state: &AppState) -> Collection<Match> {
    state.db.collection(MATCHES)
}

async fn populated(state: &AppState, filter: Document) -> Result<Vec<MatchView>> {
    let raw: Collection<Document> = state.db.collection(MATCHES);
    let pipeline = populated_pipeline(filter, Some(doc! { "date": -1 }), &MATCH_REFERENCES);
    crud::aggregate(&raw, pipeline).await
}

async fn populated_one(state: &AppState, id: ObjectId) -> Result<MatchView> {
    state
        .matches
        .find_fixture(id)
        .await?
        .ok_or(AppError::NotFound("Match"))
}

pub async fn list_matches(State(state): State<AppState>) -> Result<Json<Value>> {
    let matches = populated(&state, doc! {}).await?;
    Ok(Json(to_api_json(&matches)?))
}

pub async fn list_team_matches(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Value>> {
    let team_id = parse_object_id("team id", &team_id)?;
    let filter = doc! { "$or": [{ "homeTeam": team_id }, { "awayTeam": team_id }] };
    let matches = populated(&state, filter).await?;
    Ok(Json(to_api_json(&matches)?))
}

pub async fn get_match(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let id = parse_object_id("match id", &id)?;
    let fixture = populated_one(&state, id).await?;
    Ok(Json(to_api_json(&fixture)?))
}

/// The live-feed record for a fixture that has started. Fixtures still
/// `Upcoming` are answered without calling the feed.
pub async fn get_current_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id("match id", &id)?;
    let fixture = populated_one(&state, id).await?;

    if !fixture.status.has_started() {
        return Ok(Json(json!({
            "status": fixture.status,
            "message": "Match not started yet.",
        })));
    }

    let feed = state
        .feed
        .as_ref()
        .ok_or_else(|| AppError::configuration("CRICAPI_KEY is not configured"))?;
    let entries = feed.current_matches().await?;

    let counterpart = state.matcher.find_live_counterpart(&fixture, &entries);
    if counterpart.is_none() {
        tracing::debug!(
            "No feed entry for {} vs {} among {} current matches",
            fixture.home_name(),
            fixture.away_name(),
            entries.len()
        );
    }

    Ok(Json(json!({
        "status": fixture.status,
        "match": counterpart,
    })))
}

pub async fn create_match(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<CreateMatch>,
) -> Result<(StatusCode, Json<Value>)> {
    let fixture = payload.into_match()?;

    let fixture = crud::insert(&collection(&state), &fixture, "Match").await?;
    tracing::info!("📅 Match created by {}", admin.username);

    created("Match created successfully", "match", &fixture)
}

pub async fn update_match(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateMatch>,
) -> Result<Json<Value>> {
    let id = parse_object_id("match id", &id)?;
    let patch = payload.into_patch()?;

    let mut update = doc! { "$set": set_document(&patch)? };
    let cleared = patch.cleared_fields();
    if !cleared.is_empty() {
        let mut unset = Document::new();
        for field in cleared {
            unset.insert(field, "");
        }
        update.insert("$unset", unset);
    }

    let fixture = crud::update_by_id(&collection(&state), id, update, "Match").await?;
    tracing::info!("✏️ Match {} updated by {}", id, admin.username);

    with_message("Match updated successfully", "match", &fixture)
}

pub async fn delete_match(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id("match id", &id)?;
    crud::delete_by_id(&collection(&state), id, "Match").await?;
    tracing::info!("🗑️ Match {} deleted by {}", id, admin.username);

    Ok(Json(json!({ "message": "Match deleted successfully" })))
}
