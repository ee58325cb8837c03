// src/models/poll.rs

use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::team::Team;
use crate::models::{parse_reference, to_bson_date};

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    pub option: String,
    #[serde(default)]
    pub votes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll<T = ObjectId> {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub question: String,
    pub options: Vec<PollOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<T>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Kept in step with the option counters by the same update that changes them.
    #[serde(default)]
    pub total_votes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<BsonDateTime>,
}

pub type PollView = Poll<Team>;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePollOption {
    pub option: String,
    #[serde(default)]
    pub votes: i64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoll {
    #[validate(length(min = 1, message = "Question is required"))]
    pub question: String,
    #[validate(length(min = 2, message = "A poll needs at least two options"))]
    pub options: Vec<CreatePollOption>,
    pub team_id: Option<String>,
    pub active: Option<bool>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePoll {
    #[validate(length(min = 1, message = "Question cannot be empty"))]
    pub question: Option<String>,
    #[validate(length(min = 2, message = "A poll needs at least two options"))]
    pub options: Option<Vec<CreatePollOption>>,
    pub team_id: Option<String>,
    pub active: Option<bool>,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollPatch {
    pub question: Option<String>,
    pub options: Option<Vec<PollOption>>,
    pub total_votes: Option<i64>,
    pub team_id: Option<ObjectId>,
    pub active: Option<bool>,
    pub expires_at: Option<BsonDateTime>,
}

/// Body of `POST /api/polls/{id}/vote`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub option_index: Option<i64>,
}

/// One row of a poll's derived results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionTally {
    pub option_index: usize,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResults {
    pub poll_id: String,
    pub question: String,
    pub total_votes: i64,
    pub results: Vec<OptionTally>,
}

fn build_options(options: Vec<CreatePollOption>) -> Result<Vec<PollOption>> {
    options
        .into_iter()
        .enumerate()
        .map(|(index, option)| {
            let label = option.option.trim().to_string();
            if label.is_empty() {
                return Err(AppError::invalid_data(format!("Option {} has no text", index)));
            }
            if option.votes < 0 {
                return Err(AppError::invalid_data(format!(
                    "Option {} has a negative vote count",
                    index
                )));
            }
            Ok(PollOption {
                option: label,
                votes: option.votes,
            })
        })
        .collect()
}

impl CreatePoll {
    pub fn into_poll(self) -> Result<Poll> {
        let options = build_options(self.options)?;
        Ok(Poll {
            id: None,
            question: self.question.trim().to_string(),
            total_votes: options.iter().map(|option| option.votes).sum(),
            options,
            team_id: parse_reference("teamId", self.team_id.as_deref())?,
            active: self.active.unwrap_or(true),
            created_at: Some(BsonDateTime::now()),
            expires_at: self.expires_at.map(to_bson_date),
        })
    }
}

impl UpdatePoll {
    pub fn into_patch(self) -> Result<PollPatch> {
        let options = self.options.map(build_options).transpose()?;
        let total_votes = options
            .as_ref()
            .map(|options| options.iter().map(|option| option.votes).sum());

        Ok(PollPatch {
            question: self.question,
            options,
            total_votes,
            team_id: parse_reference("teamId", self.team_id.as_deref())?,
            active: self.active,
            expires_at: self.expires_at.map(to_bson_date),
        })
    }
}
