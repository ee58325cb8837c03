use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Database, IndexModel,
};

use crate::database::{ADMINS, MATCHES, TEAMS};
use crate::errors::Result;

/// Upsert key for published feed matches. Partial so hand-entered fixtures
/// without an external id never collide with each other.
pub fn external_match_index() -> IndexModel {
    IndexModel::builder()
        .keys(doc! { "externalMatchId": 1, "source": 1 })
        .options(
            IndexOptions::builder()
                .name("external_match_key".to_string())
                .unique(true)
                .partial_filter_expression(doc! { "externalMatchId": { "$type": "string" } })
                .build(),
        )
        .build()
}

/// Creates the indexes the write paths rely on. Idempotent.
pub async fn ensure_indexes(db: &Database) -> Result<()> {
    db.collection::<Document>(MATCHES)
        .create_index(external_match_index())
        .await?;

    let team_name = IndexModel::builder()
        .keys(doc! { "name": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<Document>(TEAMS).create_index(team_name).await?;

    let admin_username = IndexModel::builder()
        .keys(doc! { "username": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<Document>(ADMINS)
        .create_index(admin_username)
        .await?;

    tracing::info!("✅ Database indexes ensured");
    Ok(())
}
