use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Collection, Database,
};

use crate::database::POLLS;
use crate::errors::Result;
use crate::models::poll::Poll;

/// Counter operations on polls. Every mutation is a single atomic update on
/// the stored document; none of them read, modify and write back a copy.
#[async_trait]
pub trait PollStore: Send + Sync {
    async fn find(&self, id: ObjectId) -> Result<Option<Poll>>;

    /// Adds one vote to `options[option_index]`. `None` when the poll is gone
    /// or no longer has that option.
    async fn increment_vote(&self, id: ObjectId, option_index: usize) -> Result<Option<Poll>>;

    /// Zeroes every counter. `None` when the poll is gone.
    async fn reset_votes(&self, id: ObjectId) -> Result<Option<Poll>>;
}

pub struct MongoPollStore {
    db: Database,
}

impl MongoPollStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<Poll> {
        self.db.collection(POLLS)
    }
}

#[async_trait]
impl PollStore for MongoPollStore {
    async fn find(&self, id: ObjectId) -> Result<Option<Poll>> {
        Ok(self.collection().find_one(doc! { "_id": id }).await?)
    }

    async fn increment_vote(&self, id: ObjectId, option_index: usize) -> Result<Option<Poll>> {
        Ok(self
            .collection()
            .find_one_and_update(vote_filter(id, option_index), vote_update(option_index))
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn reset_votes(&self, id: ObjectId) -> Result<Option<Poll>> {
        Ok(self
            .collection()
            .find_one_and_update(doc! { "_id": id }, reset_update())
            .return_document(ReturnDocument::After)
            .await?)
    }
}

/// Matches only while the poll still has the option.
pub fn vote_filter(id: ObjectId, option_index: usize) -> Document {
    let mut filter = doc! { "_id": id };
    filter.insert(format!("options.{}", option_index), doc! { "$exists": true });
    filter
}

pub fn vote_update(option_index: usize) -> Document {
    let mut increments = Document::new();
    increments.insert(format!("options.{}.votes", option_index), 1_i64);
    increments.insert("totalVotes", 1_i64);
    doc! { "$inc": increments }
}

pub fn reset_update() -> Document {
    doc! {
        "$set": {
            "options.$[].votes": 0_i64,
            "totalVotes": 0_i64,
        }
    }
}
