use async_trait::async_trait;
use mongodb::{
    bson::{self, doc, oid::ObjectId, DateTime as BsonDateTime, Document},
    options::ReturnDocument,
    Collection, Database,
};

use crate::database::crud;
use crate::database::populate::{populated_pipeline, MATCH_REFERENCES};
use crate::database::MATCHES;
use crate::errors::{AppError, Result};
use crate::models::matches::{ExternalFixture, Match, MatchView};

/// Storage operations the reconciliation flow needs.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// A fixture with its team references resolved.
    async fn find_fixture(&self, id: ObjectId) -> Result<Option<MatchView>>;

    /// Atomic update-or-insert keyed by `(externalMatchId, source)`.
    async fn upsert_external(&self, fixture: &ExternalFixture) -> Result<Match>;
}

pub struct MongoMatchStore {
    db: Database,
}

impl MongoMatchStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<Match> {
        self.db.collection(MATCHES)
    }
}

#[async_trait]
impl MatchStore for MongoMatchStore {
    async fn find_fixture(&self, id: ObjectId) -> Result<Option<MatchView>> {
        let pipeline = populated_pipeline(doc! { "_id": id }, None, &MATCH_REFERENCES);
        let raw: Collection<Document> = self.db.collection(MATCHES);
        let views: Vec<MatchView> = crud::aggregate(&raw, pipeline).await?;
        Ok(views.into_iter().next())
    }

    async fn upsert_external(&self, fixture: &ExternalFixture) -> Result<Match> {
        let filter = external_filter(fixture);
        let update = external_upsert(fixture, BsonDateTime::now())?;

        tracing::debug!("upserting external match with filter {:?}", filter);

        self.collection()
            .find_one_and_update(filter, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::internal("upsert returned no document"))
    }
}

/// Identity of a published feed match.
pub fn external_filter(fixture: &ExternalFixture) -> Document {
    doc! {
        "externalMatchId": &fixture.external_match_id,
        "source": &fixture.source,
    }
}

/// Published rows name their teams by free text, so any team reference an
/// edit attached to either side is dropped.
pub fn external_upsert(fixture: &ExternalFixture, now: BsonDateTime) -> Result<Document> {
    let mut set = bson::to_document(fixture)?;
    set.insert("updatedAt", now);

    Ok(doc! {
        "$set": set,
        "$unset": { "homeTeam": "", "awayTeam": "" },
        "$setOnInsert": { "createdAt": now },
    })
}
