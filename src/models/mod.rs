pub mod admin;
pub mod external;
pub mod history;
pub mod matches;
pub mod news;
pub mod player;
pub mod poll;
pub mod team;

use mongodb::bson::{self, oid::ObjectId, Bson, DateTime as BsonDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{AppError, Result};

/// Renders a stored document for API clients: ObjectIds become hex strings and
/// dates become RFC 3339 strings instead of extended-JSON wrappers.
pub fn to_api_json<T: Serialize>(value: &T) -> Result<Value> {
    let bson = bson::to_bson(value)?;
    Ok(flatten_extjson(bson.into_relaxed_extjson()))
}

fn flatten_extjson(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(inner)) = map.get("$oid").or_else(|| map.get("$date")) {
                    return Value::String(inner.clone());
                }
            }
            let flattened: Map<String, Value> = map
                .into_iter()
                .map(|(key, inner)| (key, flatten_extjson(inner)))
                .collect();
            Value::Object(flattened)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(flatten_extjson).collect()),
        other => other,
    }
}

pub fn parse_object_id(field: &str, raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidObjectId(format!("{} '{}' is not a valid id", field, raw)))
}

/// Optional reference fields arrive as hex strings; empty strings mean "no reference".
pub fn parse_reference(field: &str, raw: Option<&str>) -> Result<Option<ObjectId>> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => parse_object_id(field, value).map(Some),
        _ => Ok(None),
    }
}

pub fn to_bson_date(value: chrono::DateTime<chrono::Utc>) -> BsonDateTime {
    BsonDateTime::from_chrono(value)
}

/// Drops `None` members so a partial update only touches the fields it carries.
pub fn set_document<T: Serialize>(update: &T) -> Result<bson::Document> {
    let mut document = bson::to_document(update)?;
    let empty: Vec<String> = document
        .iter()
        .filter(|(_, value)| matches!(value, Bson::Null))
        .map(|(key, _)| key.clone())
        .collect();
    for key in empty {
        document.remove(&key);
    }
    document.insert("updatedAt", BsonDateTime::now());
    Ok(document)
}
