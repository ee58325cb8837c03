use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::Result;
use crate::models::team::Team;
use crate::models::{parse_object_id, parse_reference, to_bson_date};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerRole {
    #[default]
    Batsman,
    Bowler,
    #[serde(rename = "All-rounder")]
    AllRounder,
    #[serde(rename = "Wicket-keeper")]
    WicketKeeper,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wickets: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bowling_average: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player<T = ObjectId> {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub jersey_number: i32,
    pub role: PlayerRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batting_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bowling_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

pub type PlayerView = Player<Team>;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayer {
    #[validate(length(min = 1, message = "Player name is required"))]
    pub name: String,
    #[validate(range(min = 0, message = "Jersey number cannot be negative"))]
    pub jersey_number: i32,
    pub role: PlayerRole,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub date_of_birth: Option<chrono::DateTime<chrono::Utc>>,
    pub nationality: Option<String>,
    pub profile_image: Option<String>,
    #[serde(default)]
    pub statistics: Statistics,
    pub biography: Option<String>,
    #[validate(length(min = 1, message = "Team is required"))]
    pub team_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayer {
    #[validate(length(min = 1, message = "Player name cannot be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "Jersey number cannot be negative"))]
    pub jersey_number: Option<i32>,
    pub role: Option<PlayerRole>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub date_of_birth: Option<chrono::DateTime<chrono::Utc>>,
    pub nationality: Option<String>,
    pub profile_image: Option<String>,
    pub statistics: Option<Statistics>,
    pub biography: Option<String>,
    pub team_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub jersey_number: Option<i32>,
    pub role: Option<PlayerRole>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub date_of_birth: Option<BsonDateTime>,
    pub nationality: Option<String>,
    pub profile_image: Option<String>,
    pub statistics: Option<Statistics>,
    pub biography: Option<String>,
    pub team_id: Option<ObjectId>,
}

impl CreatePlayer {
    pub fn into_player(self) -> Result<Player> {
        let team_id = parse_object_id("teamId", &self.team_id)?;
        let now = BsonDateTime::now();
        Ok(Player {
            id: None,
            name: self.name.trim().to_string(),
            jersey_number: self.jersey_number,
            role: self.role,
            batting_style: self.batting_style,
            bowling_style: self.bowling_style,
            date_of_birth: self.date_of_birth.map(to_bson_date),
            nationality: self.nationality,
            profile_image: self.profile_image,
            statistics: self.statistics,
            biography: self.biography,
            team_id: Some(team_id),
            created_at: Some(now),
            updated_at: Some(now),
        })
    }
}

impl UpdatePlayer {
    pub fn into_patch(self) -> Result<PlayerPatch> {
        Ok(PlayerPatch {
            name: self.name,
            jersey_number: self.jersey_number,
            role: self.role,
            batting_style: self.batting_style,
            bowling_style: self.bowling_style,
            date_of_birth: self.date_of_birth.map(to_bson_date),
            nationality: self.nationality,
            profile_image: self.profile_image,
            statistics: self.statistics,
            biography: self.biography,
            team_id: parse_reference("teamId", self.team_id.as_deref())?,
        })
    }
}
