use futures::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{Client, Collection};
use thiserror::Error;

use crate::models::Match;

const COLLECTION: &str = "Matches";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed match id: {0}")]
    MalformedId(#[from] mongodb::bson::oid::Error),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Data-access client for the `Matches` collection. Cheap to construct: the
/// shared [`Client`] carries the connection pool, so handlers build one of
/// these per request.
pub struct MatchStore {
    matches: Collection<Document>,
}

impl MatchStore {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let matches = client.database(db_name).collection::<Document>(COLLECTION);
        Self { matches }
    }

    /// Every match, in store-native order.
    pub async fn list_all(&self) -> Result<Vec<Match>, StoreError> {
        let mut cursor = self.matches.find(doc! {}).await?;
        let mut all = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            all.push(Match::from_document(doc));
        }
        Ok(all)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Match>, StoreError> {
        let oid = ObjectId::parse_str(id)?;
        let found = self.matches.find_one(doc! { "_id": oid }).await?;
        Ok(found.map(Match::from_document))
    }

    /// Inserts the match and hands it back carrying the assigned id.
    pub async fn insert(&self, m: Match) -> Result<Match, StoreError> {
        let doc = m.into_document();
        let result = self.matches.insert_one(&doc).await?;
        let mut created = Match::from_document(doc);
        if created.id.is_none() {
            created.id = result.inserted_id.as_object_id();
        }
        Ok(created)
    }

    /// Whole-document replace, last-writer-wins. Returns the modified count;
    /// the caller decides what a zero means.
    pub async fn replace(&self, id: &str, m: Match) -> Result<u64, StoreError> {
        let oid = ObjectId::parse_str(id)?;
        let mut replacement = m.into_document();
        // the stored identifier is immutable; never write one from the payload
        replacement.remove("_id");
        let result = self
            .matches
            .replace_one(doc! { "_id": oid }, replacement)
            .await?;
        Ok(result.modified_count)
    }

    /// Returns the deleted count; zero means no match had this id.
    pub async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let oid = ObjectId::parse_str(id)?;
        let result = self.matches.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count)
    }
}
