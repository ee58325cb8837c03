use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use mongodb::{
    bson::{doc, Document},
    Collection,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    database::{crud, populate::populated_pipeline, populate::TEAM_REFERENCE, NEWS},
    errors::{AppError, Result},
    handlers::{created, with_message, AppJson},
    models::{
        admin::CurrentAdmin,
        news::{CreateNews, News, NewsView, UpdateNews},
        parse_object_id, set_document, to_api_json,
    },
    state::AppState,
};

fn collection(state: &AppState) -> Collection<News> {
    state.db.collection(NEWS)
}

async fn populated(state: &AppState, filter: Document) -> Result<Vec<NewsView>> {
    let raw: Collection<Document> = state.db.collection(NEWS);
    let pipeline = populated_pipeline(filter, Some(doc! { "publishedAt": -1 }), &TEAM_REFERENCE);
    crud::aggregate(&raw, pipeline).await
}

pub async fn list_news(State(state): State<AppState>) -> Result<Json<Value>> {
    let articles = populated(&state, doc! {}).await?;
    Ok(Json(to_api_json(&articles)?))
}

pub async fn list_team_news(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<Value>> {
    let team_id = parse_object_id("team id", &team_id)?;
    let articles = populated(&state, doc! { "teamId": team_id }).await?;
    Ok(Json(to_api_json(&articles)?))
}

/// Counts the read with an atomic `$inc` before returning the article.
pub async fn get_news(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>> {
    let id = parse_object_id("news id", &id)?;

    let counted = collection(&state)
        .update_one(doc! { "_id": id }, doc! { "$inc": { "views": 1_i64 } })
        .await?;
    if counted.matched_count == 0 {
        return Err(AppError::NotFound("News article"));
    }

    let article = populated(&state, doc! { "_id": id })
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound("News article"))?;
    Ok(Json(to_api_json(&article)?))
}

pub async fn create_news(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<CreateNews>,
) -> Result<(StatusCode, Json<Value>)> {
    payload.validate()?;
    let article = payload.into_news()?;

    let article = crud::insert(&collection(&state), &article, "News article").await?;
    tracing::info!("📰 News '{}' published by {}", article.title, admin.username);

    created("News created successfully", "news", &article)
}

pub async fn update_news(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateNews>,
) -> Result<Json<Value>> {
    payload.validate()?;
    let id = parse_object_id("news id", &id)?;
    let patch = payload.into_patch()?;

    let update = doc! { "$set": set_document(&patch)? };
    let article = crud::update_by_id(&collection(&state), id, update, "News article").await?;
    tracing::info!("✏️ News {} updated by {}", id, admin.username);

    with_message("News updated successfully", "news", &article)
}

pub async fn delete_news(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_object_id("news id", &id)?;
    crud::delete_by_id(&collection(&state), id, "News article").await?;
    tracing::info!("🗑️ News {} deleted by {}", id, admin.username);

    Ok(Json(json!({ "message": "News deleted successfully" })))
}
