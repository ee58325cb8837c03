use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::Result;
use crate::models::parse_reference;
use crate::models::team::Team;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NewsCategory {
    Transfer,
    #[serde(rename = "Match Report")]
    MatchReport,
    Injury,
    Achievement,
    #[default]
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News<T = ObjectId> {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<T>,
    #[serde(default)]
    pub category: NewsCategory,
    #[serde(default)]
    pub views: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<BsonDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<BsonDateTime>,
}

pub type NewsView = News<Team>;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNews {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub image: Option<String>,
    pub author: Option<String>,
    pub team_id: Option<String>,
    pub category: Option<NewsCategory>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNews {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub team_id: Option<String>,
    pub category: Option<NewsCategory>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub team_id: Option<ObjectId>,
    pub category: Option<NewsCategory>,
}

impl CreateNews {
    pub fn into_news(self) -> Result<News> {
        let now = BsonDateTime::now();
        Ok(News {
            id: None,
            title: self.title,
            content: self.content,
            image: self.image,
            author: self.author,
            team_id: parse_reference("teamId", self.team_id.as_deref())?,
            category: self.category.unwrap_or_default(),
            views: 0,
            published_at: Some(now),
            updated_at: Some(now),
        })
    }
}

impl UpdateNews {
    pub fn into_patch(self) -> Result<NewsPatch> {
        Ok(NewsPatch {
            title: self.title,
            content: self.content,
            image: self.image,
            author: self.author,
            team_id: parse_reference("teamId", self.team_id.as_deref())?,
            category: self.category,
        })
    }
}
