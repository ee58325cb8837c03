pub(crate) mod admin_auth;
pub(crate) mod cricket_matches;
pub(crate) mod history;
pub(crate) mod matches;
pub(crate) mod news;
pub(crate) mod players;
pub(crate) mod polls;
pub(crate) mod teams;

use axum::{extract::FromRequest, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{AppError, Result};
use crate::models::to_api_json;

/// Request body extractor; malformed JSON answers with the usual error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub(crate) struct AppJson<T>(pub T);

/// `{ "message": ..., <key>: <item> }`, the shape admin writes answer with.
pub(crate) fn with_message<T: Serialize>(message: &str, key: &str, item: &T) -> Result<Json<Value>> {
    let mut body = Map::new();
    body.insert("message".to_string(), Value::String(message.to_string()));
    body.insert(key.to_string(), to_api_json(item)?);
    Ok(Json(Value::Object(body)))
}

pub(crate) fn created<T: Serialize>(
    message: &str,
    key: &str,
    item: &T,
) -> Result<(StatusCode, Json<Value>)> {
    Ok((StatusCode::CREATED, with_message(message, key, item)?))
}
