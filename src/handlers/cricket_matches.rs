use axum::{extract::State, response::Json, Extension};
use serde_json::Value;

use crate::{
    errors::{AppError, Result},
    handlers::{with_message, AppJson},
    models::{
        admin::CurrentAdmin,
        external::{FeedMatchesResponse, PublishRequest},
    },
    services::reconcile,
    state::AppState,
};

/// Current matches straight from the live-score feed.
pub async fn list_current(State(state): State<AppState>) -> Result<Json<FeedMatchesResponse>> {
    let feed = state
        .feed
        .as_ref()
        .ok_or_else(|| AppError::configuration("CRICAPI_KEY is not configured"))?;

    let data = feed.current_matches().await?;
    Ok(Json(FeedMatchesResponse { data }))
}

/// Upserts the posted feed record into `matches`.
pub async fn publish(
    State(state): State<AppState>,
    Extension(admin): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<PublishRequest>,
) -> Result<Json<Value>> {
    let feed_match = payload
        .feed_match
        .ok_or_else(|| AppError::invalid_data("match is required"))?;

    let published = reconcile::publish(state.matches.as_ref(), &feed_match).await?;
    tracing::info!(
        "✅ External match {} published by {}",
        published.external_match_id.as_deref().unwrap_or_default(),
        admin.username
    );

    with_message("Match published successfully", "match", &published)
}
