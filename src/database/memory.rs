// In-memory stores for tests. Each mutation runs under one lock, which gives
// the same per-document atomicity the MongoDB updates provide.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::database::match_store::MatchStore;
use crate::database::poll_store::PollStore;
use crate::errors::Result;
use crate::models::matches::{ExternalFixture, Match, MatchView};
use crate::models::poll::Poll;

#[derive(Default)]
pub struct InMemoryMatchStore {
    fixtures: Mutex<HashMap<ObjectId, MatchView>>,
    published: Mutex<Vec<Match>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixture(self, fixture: MatchView) -> Self {
        let id = fixture.id.unwrap_or_else(ObjectId::new);
        self.fixtures
            .lock()
            .unwrap()
            .insert(id, MatchView { id: Some(id), ..fixture });
        self
    }

    pub fn with_published(self, row: Match) -> Self {
        self.published.lock().unwrap().push(row);
        self
    }

    pub fn published(&self) -> Vec<Match> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl MatchStore for InMemoryMatchStore {
    async fn find_fixture(&self, id: ObjectId) -> Result<Option<MatchView>> {
        Ok(self.fixtures.lock().unwrap().get(&id).cloned())
    }

    async fn upsert_external(&self, fixture: &ExternalFixture) -> Result<Match> {
        let now = BsonDateTime::now();
        let mut rows = self.published.lock().unwrap();

        let position = rows.iter().position(|row| {
            row.external_match_id.as_deref() == Some(fixture.external_match_id.as_str())
                && row.source.as_deref() == Some(fixture.source.as_str())
        });

        let row = match position {
            Some(index) => &mut rows[index],
            None => {
                rows.push(Match {
                    id: Some(ObjectId::new()),
                    external_match_id: Some(fixture.external_match_id.clone()),
                    source: Some(fixture.source.clone()),
                    created_at: Some(now),
                    ..Match::default()
                });
                rows.last_mut().unwrap()
            }
        };

        // `$set` semantics: absent optional fields keep their stored value.
        row.home_team = None;
        row.away_team = None;
        row.home_team_name = Some(fixture.home_team_name.clone());
        row.away_team_name = Some(fixture.away_team_name.clone());
        row.status = fixture.status;
        if fixture.venue.is_some() {
            row.venue = fixture.venue.clone();
        }
        if fixture.date.is_some() {
            row.date = fixture.date;
        }
        if fixture.result.is_some() {
            row.result = fixture.result.clone();
        }
        if fixture.description.is_some() {
            row.description = fixture.description.clone();
        }
        row.updated_at = Some(now);

        Ok(row.clone())
    }
}

#[derive(Default)]
pub struct InMemoryPollStore {
    polls: Mutex<HashMap<ObjectId, Poll>>,
}

impl InMemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, poll: Poll) -> ObjectId {
        let id = poll.id.unwrap_or_else(ObjectId::new);
        self.polls
            .lock()
            .unwrap()
            .insert(id, Poll { id: Some(id), ..poll });
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<Poll> {
        self.polls.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl PollStore for InMemoryPollStore {
    async fn find(&self, id: ObjectId) -> Result<Option<Poll>> {
        Ok(self.get(id))
    }

    async fn increment_vote(&self, id: ObjectId, option_index: usize) -> Result<Option<Poll>> {
        let mut polls = self.polls.lock().unwrap();
        let Some(poll) = polls.get_mut(&id) else {
            return Ok(None);
        };
        let Some(option) = poll.options.get_mut(option_index) else {
            return Ok(None);
        };
        option.votes += 1;
        poll.total_votes += 1;
        Ok(Some(poll.clone()))
    }

    async fn reset_votes(&self, id: ObjectId) -> Result<Option<Poll>> {
        let mut polls = self.polls.lock().unwrap();
        let Some(poll) = polls.get_mut(&id) else {
            return Ok(None);
        };
        for option in &mut poll.options {
            option.votes = 0;
        }
        poll.total_votes = 0;
        Ok(Some(poll.clone()))
    }
}
