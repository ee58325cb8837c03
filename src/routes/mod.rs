pub mod auth;
pub mod history;
pub mod matches;
pub mod news;
pub mod players;
pub mod polls;
pub mod teams;

use axum::{
    extract::State,
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    response::Json,
    routing::get,
    Router,
};
use mongodb::bson::doc;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::middleware::auth::require_admin;
use crate::state::AppState;

fn cors_layer(config: &AppConfig) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Ok(match &config.cors_origin {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin).map_err(|_| {
                AppError::configuration(format!("CORS_ORIGIN '{}' is not a valid origin", origin))
            })?;
            cors.allow_origin(origin)
        }
        None => cors.allow_origin(Any),
    })
}

pub fn app_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config)?;

    let admin = Router::new()
        .merge(auth::account_routes())
        .nest("/teams", teams::admin_routes())
        .nest("/players", players::admin_routes())
        .nest("/matches", matches::admin_routes())
        .nest("/cricket-matches", matches::cricket_routes())
        .nest("/news", news::admin_routes())
        .nest("/polls", polls::admin_routes())
        .nest("/history", history::admin_routes())
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    Ok(Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/api/health", get(api_health_check))
        .nest("/api/team", teams::routes())
        .nest("/api/players", players::routes())
        .nest("/api/matches", matches::routes())
        .nest("/api/news", news::routes())
        .nest("/api/polls", polls::routes())
        .nest("/api/history", history::routes())
        .nest("/api/admin", auth::login_routes().merge(admin))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

async fn root_handler() -> &'static str {
    "🏏 Fan Site API"
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_health_check(State(state): State<AppState>) -> Json<Value> {
    let db_status = match state.db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("Database ping failed: {}", e);
            "disconnected"
        }
    };

    Json(json!({
        "status": "healthy",
        "database": db_status,
        "liveFeed": state.feed.is_some(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
