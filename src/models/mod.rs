use mongodb::bson::{Bson, Document, oid::ObjectId};
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Errors produced while turning a request body into a [`Match`].
#[derive(Debug, Error)]
pub enum MatchParseError {
    #[error("body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object describing a match")]
    NotAnObject,
    #[error("match id must be a 24-character hex string")]
    BadId,
    #[error("match payload cannot be stored: {0}")]
    Unrepresentable(#[from] mongodb::bson::ser::Error),
}

/// A match record: the store-assigned identifier plus an opaque set of
/// match-fact fields. The fact schema is owned by the clients of this
/// service, so fields pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Stored as `_id` in the collection, rendered as a hex `id` in JSON.
    #[serde(serialize_with = "serialize_hex_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub facts: Document,
}

impl Match {
    pub fn from_json(body: &str) -> Result<Match, MatchParseError> {
        let value: Value = serde_json::from_str(body)?;
        Match::from_json_value(value)
    }

    /// Accepts any JSON object. The identifier field is matched
    /// case-insensitively (`id` or `_id` in any casing); every other field
    /// is carried through with its original name.
    pub fn from_json_value(value: Value) -> Result<Match, MatchParseError> {
        let Value::Object(map) = value else {
            return Err(MatchParseError::NotAnObject);
        };

        let mut id = None;
        let mut facts = serde_json::Map::new();
        for (key, value) in map {
            if key.eq_ignore_ascii_case("id") || key.eq_ignore_ascii_case("_id") {
                id = match value {
                    Value::Null => None,
                    Value::String(s) => {
                        Some(ObjectId::parse_str(&s).map_err(|_| MatchParseError::BadId)?)
                    }
                    _ => return Err(MatchParseError::BadId),
                };
            } else {
                facts.insert(key, value);
            }
        }

        let facts = mongodb::bson::to_document(&facts)?;
        Ok(Match { id, facts })
    }

    /// Splits a stored document into identifier and facts.
    pub fn from_document(mut doc: Document) -> Match {
        let id = match doc.remove("_id") {
            Some(Bson::ObjectId(oid)) => Some(oid),
            _ => None,
        };
        Match { id, facts: doc }
    }

    /// The storable form: facts plus `_id` when one is assigned.
    pub fn into_document(self) -> Document {
        let mut doc = self.facts;
        if let Some(oid) = self.id {
            doc.insert("_id", oid);
        }
        doc
    }
}

fn serialize_hex_id<S: Serializer>(id: &Option<ObjectId>, s: S) -> Result<S::Ok, S::Error> {
    match id {
        Some(oid) => s.serialize_str(&oid.to_hex()),
        None => s.serialize_none(),
    }
}
