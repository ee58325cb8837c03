use std::sync::Arc;

use mongodb::Database;

use crate::config::AppConfig;
use crate::database::match_store::{MatchStore, MongoMatchStore};
use crate::database::poll_store::{MongoPollStore, PollStore};
use crate::errors::Result;
use crate::services::cricket_feed::{CricApiClient, MatchFeed};
use crate::services::reconcile::TeamNameMatcher;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub matches: Arc<dyn MatchStore>,
    pub polls: Arc<dyn PollStore>,
    /// `None` when no feed API key is configured.
    pub feed: Option<Arc<dyn MatchFeed>>,
    pub matcher: Arc<TeamNameMatcher>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Result<Self> {
        let feed: Option<Arc<dyn MatchFeed>> = match &config.cricapi_key {
            Some(key) => Some(Arc::new(CricApiClient::new(
                &config.cricapi_base_url,
                key,
                config.cricapi_timeout,
            )?)),
            None => {
                tracing::warn!("⚠️ CRICAPI_KEY is not set, live match endpoints will be unavailable");
                None
            }
        };

        Ok(AppState {
            matches: Arc::new(MongoMatchStore::new(db.clone())),
            polls: Arc::new(MongoPollStore::new(db.clone())),
            matcher: Arc::new(TeamNameMatcher::with_aliases(&config.team_aliases)),
            config: Arc::new(config),
            feed,
            db,
        })
    }
}

#[cfg(test)]
impl AppState {
    pub fn with_match_store(mut self, matches: Arc<dyn MatchStore>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_poll_store(mut self, polls: Arc<dyn PollStore>) -> Self {
        self.polls = polls;
        self
    }

    pub fn with_feed(mut self, feed: Arc<dyn MatchFeed>) -> Self {
        self.feed = Some(feed);
        self
    }
}
