use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};
use crate::models::player::Player;
use crate::models::team::Team;
use crate::models::{parse_reference, to_bson_date};

pub const EXTERNAL_SOURCE: &str = "cricapi";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Completed,
}

impl MatchStatus {
    pub fn has_started(self) -> bool {
        !matches!(self, MatchStatus::Upcoming)
    }
}

/// A fixture. `T` is the team reference and `P` the player reference: stored
/// documents hold ObjectIds, populated reads hold the referenced documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match<T = ObjectId, P = ObjectId> {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_number: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_match_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<BsonDateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_team: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_team_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_team: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_team_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_team_score: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub away_team_score: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_team_id: Option<T>,

    #[serde(default)]
    pub status: MatchStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_score_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub man_of_match: Option<P>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub man_of_match_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

// Hand-written so `T` and `P` need no `Default` bound.
impl<T, P> Default for Match<T, P> {
    fn default() -> Self {
        Match {
            id: None,
            match_number: None,
            external_match_id: None,
            source: None,
            date: None,
            venue: None,
            home_team: None,
            home_team_name: None,
            away_team: None,
            away_team_name: None,
            home_team_score: None,
            away_team_score: None,
            result: None,
            winner_team_id: None,
            status: MatchStatus::default(),
            highlights: None,
            live_score_url: None,
            man_of_match: None,
            man_of_match_name: None,
            description: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A match with its team and man-of-match references resolved.
pub type MatchView = Match<Team, Player>;

impl MatchView {
    /// Display name of the home side: the referenced team's name, else the free-text name.
    pub fn home_name(&self) -> &str {
        self.home_team
            .as_ref()
            .map(|team| team.name.as_str())
            .or(self.home_team_name.as_deref())
            .unwrap_or("")
    }

    pub fn away_name(&self) -> &str {
        self.away_team
            .as_ref()
            .map(|team| team.name.as_str())
            .or(self.away_team_name.as_deref())
            .unwrap_or("")
    }
}

/// The fields a feed record contributes when it is published.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalFixture {
    pub external_match_id: String,
    pub source: String,
    pub home_team_name: String,
    pub away_team_name: String,
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatch {
    pub match_number: Option<i32>,
    pub date: Option<chrono::DateTime<chrono::Utc>>,
    pub venue: Option<String>,
    pub home_team: Option<String>,
    pub home_team_name: Option<String>,
    pub away_team: Option<String>,
    pub away_team_name: Option<String>,
    pub home_team_score: Option<i32>,
    pub away_team_score: Option<i32>,
    pub result: Option<String>,
    pub winner_team_id: Option<String>,
    pub status: Option<MatchStatus>,
    pub highlights: Option<String>,
    pub live_score_url: Option<String>,
    pub man_of_match: Option<String>,
    pub man_of_match_name: Option<String>,
    pub description: Option<String>,
}

/// Partial update; every field is optional and only present ones are written.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatch {
    pub match_number: Option<i32>,
    pub date: Option<chrono::DateTime<chrono::Utc>>,
    pub venue: Option<String>,
    pub home_team: Option<String>,
    pub home_team_name: Option<String>,
    pub away_team: Option<String>,
    pub away_team_name: Option<String>,
    pub home_team_score: Option<i32>,
    pub away_team_score: Option<i32>,
    pub result: Option<String>,
    pub winner_team_id: Option<String>,
    pub status: Option<MatchStatus>,
    pub highlights: Option<String>,
    pub live_score_url: Option<String>,
    pub man_of_match: Option<String>,
    pub man_of_match_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPatch {
    pub match_number: Option<i32>,
    pub date: Option<BsonDateTime>,
    pub venue: Option<String>,
    pub home_team: Option<ObjectId>,
    pub home_team_name: Option<String>,
    pub away_team: Option<ObjectId>,
    pub away_team_name: Option<String>,
    pub home_team_score: Option<i32>,
    pub away_team_score: Option<i32>,
    pub result: Option<String>,
    pub winner_team_id: Option<ObjectId>,
    pub status: Option<MatchStatus>,
    pub highlights: Option<String>,
    pub live_score_url: Option<String>,
    pub man_of_match: Option<ObjectId>,
    pub man_of_match_name: Option<String>,
    pub description: Option<String>,
}

impl MatchPatch {
    /// Switching a side between reference and free text clears the other form.
    pub fn cleared_fields(&self) -> Vec<&'static str> {
        let mut cleared = Vec::new();
        if self.home_team.is_some() {
            cleared.push("homeTeamName");
        }
        if self.home_team_name.is_some() {
            cleared.push("homeTeam");
        }
        if self.away_team.is_some() {
            cleared.push("awayTeamName");
        }
        if self.away_team_name.is_some() {
            cleared.push("awayTeam");
        }
        cleared
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Each side is named exactly once: by team reference or by free text.
fn check_side(side: &str, reference: &Option<ObjectId>, name: &Option<String>) -> Result<()> {
    match (reference, name) {
        (Some(_), Some(_)) => Err(AppError::invalid_data(format!(
            "{} side must reference a team or name one, not both",
            side
        ))),
        (None, None) => Err(AppError::invalid_data(format!(
            "{} side needs a team reference or a team name",
            side
        ))),
        _ => Ok(()),
    }
}

impl CreateMatch {
    pub fn into_match(self) -> Result<Match> {
        let home_team = parse_reference("homeTeam", self.home_team.as_deref())?;
        let away_team = parse_reference("awayTeam", self.away_team.as_deref())?;
        let home_team_name = non_empty(self.home_team_name);
        let away_team_name = non_empty(self.away_team_name);

        check_side("home", &home_team, &home_team_name)?;
        check_side("away", &away_team, &away_team_name)?;

        let now = BsonDateTime::now();
        Ok(Match {
            id: None,
            match_number: self.match_number,
            external_match_id: None,
            source: None,
            date: self.date.map(to_bson_date),
            venue: self.venue,
            home_team,
            home_team_name,
            away_team,
            away_team_name,
            home_team_score: self.home_team_score,
            away_team_score: self.away_team_score,
            result: self.result,
            winner_team_id: parse_reference("winnerTeamId", self.winner_team_id.as_deref())?,
            status: self.status.unwrap_or_default(),
            highlights: self.highlights,
            live_score_url: self.live_score_url,
            man_of_match: parse_reference("manOfMatch", self.man_of_match.as_deref())?,
            man_of_match_name: self.man_of_match_name,
            description: self.description,
            created_at: Some(now),
            updated_at: Some(now),
        })
    }
}

impl UpdateMatch {
    pub fn into_patch(self) -> Result<MatchPatch> {
        let home_team = parse_reference("homeTeam", self.home_team.as_deref())?;
        let away_team = parse_reference("awayTeam", self.away_team.as_deref())?;
        let home_team_name = non_empty(self.home_team_name);
        let away_team_name = non_empty(self.away_team_name);

        // A patch may touch one form of a side, never both at once.
        for (side, reference, name) in [
            ("home", &home_team, &home_team_name),
            ("away", &away_team, &away_team_name),
        ] {
            if reference.is_some() && name.is_some() {
                check_side(side, reference, name)?;
            }
        }

        Ok(MatchPatch {
            match_number: self.match_number,
            date: self.date.map(to_bson_date),
            venue: self.venue,
            home_team,
            home_team_name,
            away_team,
            away_team_name,
            home_team_score: self.home_team_score,
            away_team_score: self.away_team_score,
            result: self.result,
            winner_team_id: parse_reference("winnerTeamId", self.winner_team_id.as_deref())?,
            status: self.status,
            highlights: self.highlights,
            live_score_url: self.live_score_url,
            man_of_match: parse_reference("manOfMatch", self.man_of_match.as_deref())?,
            man_of_match_name: self.man_of_match_name,
            description: self.description,
        })
    }
}
