// Single-document helpers shared by the resource handlers.

use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Collection,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{AppError, Result};

pub async fn list<T>(collection: &Collection<T>, filter: Document, sort: Document) -> Result<Vec<T>>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let cursor = collection.find(filter).sort(sort).await?;
    Ok(cursor.try_collect().await?)
}

/// Runs an aggregation and decodes each result as `V` (usually a populated view).
pub async fn aggregate<V>(collection: &Collection<Document>, pipeline: Vec<Document>) -> Result<Vec<V>>
where
    V: DeserializeOwned + Unpin + Send + Sync,
{
    let cursor = collection.aggregate(pipeline).await?;
    Ok(cursor.with_type::<V>().try_collect().await?)
}

pub async fn find_by_id<T>(collection: &Collection<T>, id: ObjectId, entity: &'static str) -> Result<T>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    collection
        .find_one(doc! { "_id": id })
        .await?
        .ok_or(AppError::NotFound(entity))
}

/// Inserts and reads the stored document back.
pub async fn insert<T>(collection: &Collection<T>, item: &T, entity: &'static str) -> Result<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    let result = collection.insert_one(item).await?;
    collection
        .find_one(doc! { "_id": result.inserted_id })
        .await?
        .ok_or(AppError::NotFound(entity))
}

/// Applies `update` atomically and returns the document as it is afterwards.
pub async fn update_by_id<T>(
    collection: &Collection<T>,
    id: ObjectId,
    update: Document,
    entity: &'static str,
) -> Result<T>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    collection
        .find_one_and_update(doc! { "_id": id }, update)
        .return_document(ReturnDocument::After)
        .await?
        .ok_or(AppError::NotFound(entity))
}

pub async fn delete_by_id<T>(collection: &Collection<T>, id: ObjectId, entity: &'static str) -> Result<()>
where
    T: Send + Sync,
{
    let result = collection.delete_one(doc! { "_id": id }).await?;
    if result.deleted_count == 0 {
        return Err(AppError::NotFound(entity));
    }
    Ok(())
}
