use chrono::Datelike;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::Result;
use crate::models::parse_reference;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct History {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateHistory {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub image: Option<String>,
    pub year: Option<i32>,
    pub team_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHistory {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    pub image: Option<String>,
    pub year: Option<i32>,
    pub team_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub year: Option<i32>,
    pub team_id: Option<ObjectId>,
}

impl CreateHistory {
    pub fn into_history(self) -> Result<History> {
        let now = BsonDateTime::now();
        Ok(History {
            id: None,
            title: self.title,
            description: self.description,
            image: self.image,
            year: self.year.unwrap_or_else(|| chrono::Utc::now().year()),
            team_id: parse_reference("teamId", self.team_id.as_deref())?,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }
}

impl UpdateHistory {
    pub fn into_patch(self) -> Result<HistoryPatch> {
        Ok(HistoryPatch {
            title: self.title,
            description: self.description,
            image: self.image,
            year: self.year,
            team_id: parse_reference("teamId", self.team_id.as_deref())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn year_defaults_to_the_current_year() {
        let payload: CreateHistory = serde_json::from_value(json!({
            "title": "First title",
            "description": "Champions for the first time",
        }))
        .unwrap();

        let history = payload.into_history().unwrap();
        assert_eq!(history.year, chrono::Utc::now().year());
    }
}
