use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headquarters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub wins: i32,
    #[serde(default)]
    pub losses: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeam {
    #[validate(length(min = 1, message = "Team name is required"))]
    pub name: String,
    pub logo: Option<String>,
    pub founded: Option<i32>,
    pub headquarters: Option<String>,
    pub coach_name: Option<String>,
    pub captain_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[validate(range(min = 0, message = "Wins cannot be negative"))]
    pub wins: Option<i32>,
    #[validate(range(min = 0, message = "Losses cannot be negative"))]
    pub losses: Option<i32>,
    pub social_links: Option<SocialLinks>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeam {
    #[validate(length(min = 1, message = "Team name cannot be empty"))]
    pub name: Option<String>,
    pub logo: Option<String>,
    pub founded: Option<i32>,
    pub headquarters: Option<String>,
    pub coach_name: Option<String>,
    pub captain_name: Option<String>,
    pub description: Option<String>,
    pub colors: Option<Vec<String>>,
    #[validate(range(min = 0, message = "Wins cannot be negative"))]
    pub wins: Option<i32>,
    #[validate(range(min = 0, message = "Losses cannot be negative"))]
    pub losses: Option<i32>,
    pub social_links: Option<SocialLinks>,
}

impl From<CreateTeam> for Team {
    fn from(payload: CreateTeam) -> Self {
        let now = BsonDateTime::now();
        Team {
            id: None,
            name: payload.name.trim().to_string(),
            logo: payload.logo,
            founded: payload.founded,
            headquarters: payload.headquarters,
            coach_name: payload.coach_name,
            captain_name: payload.captain_name,
            description: payload.description,
            colors: payload.colors,
            wins: payload.wins.unwrap_or(0),
            losses: payload.losses.unwrap_or(0),
            social_links: payload.social_links,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}
