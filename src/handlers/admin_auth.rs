use axum::{extract::State, http::StatusCode, response::Json, Extension};
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    Collection,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    database::{crud, ADMINS},
    errors::{AppError, Result},
    handlers::AppJson,
    models::admin::{Admin, AdminResponse, AuthResponse, CurrentAdmin, LoginRequest, RegisterAdmin},
    services::accounts::{find_by_login, hash_password, issue_token, verify_password},
    state::AppState,
};

fn admin_response(admin: &Admin) -> AdminResponse {
    AdminResponse {
        id: admin.id.map(|id| id.to_hex()).unwrap_or_default(),
        username: admin.username.clone(),
        email: admin.email.clone(),
        role: admin.role,
    }
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let admin = find_by_login(&state.db, payload.username.trim())
        .await?
        .ok_or(AppError::AuthError)?;

    if !verify_password(&payload.password, &admin.password_hash) {
        tracing::warn!("Failed login for admin '{}'", admin.username);
        return Err(AppError::AuthError);
    }

    let token = issue_token(&state.config.jwt_secret, &admin)?;
    tracing::info!("🔐 Admin '{}' logged in", admin.username);

    Ok(Json(AuthResponse {
        token,
        admin: admin_response(&admin),
    }))
}

pub async fn me(Extension(admin): Extension<CurrentAdmin>) -> Json<Value> {
    Json(json!({ "admin": AdminResponse::from(&admin) }))
}

/// Super-admins only.
pub async fn register(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAdmin>,
    AppJson(payload): AppJson<RegisterAdmin>,
) -> Result<(StatusCode, Json<Value>)> {
    if !current.is_super_admin() {
        return Err(AppError::Unauthorized);
    }
    payload.validate()?;

    let admins: Collection<Admin> = state.db.collection(ADMINS);
    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_lowercase();

    let existing = admins
        .find_one(doc! { "$or": [{ "username": &username }, { "email": &email }] })
        .await?;
    if existing.is_some() {
        return Err(AppError::invalid_data("An admin with that username or email already exists"));
    }

    let admin = Admin {
        id: None,
        username,
        email,
        password_hash: hash_password(&payload.password)?,
        role: payload.role.unwrap_or_default(),
        created_at: Some(BsonDateTime::now()),
    };
    let admin = crud::insert(&admins, &admin, "Admin").await?;
    tracing::info!("👤 Admin '{}' registered by {}", admin.username, current.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Admin created successfully",
            "admin": admin_response(&admin),
        })),
    ))
}
