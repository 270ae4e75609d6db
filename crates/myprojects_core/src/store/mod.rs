//! Document collection contract.
//!
//! # Responsibility
//! - Define the generic collection handle the repository layer talks to.
//! - Keep storage engine details behind a trait seam.
//!
//! # Invariants
//! - Every stored document is a JSON object whose identifier lives under
//!   the reserved `_id` key.
//! - Identifiers are generated by the store on insert and never reused.
//! - Lookups are exact-match on identifier; listing is a full scan.

use crate::db::DbError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

mod sqlite;

pub use sqlite::SqliteCollection;

/// Reserved document key holding the identifier.
pub const ID_KEY: &str = "_id";

/// Store-native document identifier.
pub type DocumentId = Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Documents must serialize to a JSON object.
    NotAnObject,
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotAnObject => write!(f, "document body must be a JSON object"),
            Self::Encode(err) => write!(f, "failed to encode document: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotAnObject => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One stored document as read back from the collection, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Identifier column value as stored.
    pub id: String,
    /// JSON body text, `_id` included.
    pub body: String,
}

impl RawDocument {
    /// Decodes the body into a typed document.
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// Length of the hyphenated identifier spelling, e.g.
/// `67e55044-10b1-426f-9247-bb680e5fe0c8`.
const HYPHENATED_ID_LEN: usize = 36;

/// Parses caller-supplied identifier text into the store-native format.
///
/// Only the hyphenated spelling is accepted; padded, braced, simple and
/// `urn:uuid:` forms are rejected so one document has one id text.
pub fn parse_document_id(text: &str) -> Option<DocumentId> {
    if text.len() != HYPHENATED_ID_LEN {
        return None;
    }
    Uuid::try_parse(text).ok()
}

/// Generic document collection handle.
///
/// Implementations add no locking of their own; concurrent writers are
/// resolved by the backing engine.
pub trait DocumentCollection {
    /// Collection name, e.g. `projects`.
    fn name(&self) -> &str;

    /// Inserts a new document and returns its store-generated identifier.
    ///
    /// Any `_id` already present in `document` is overwritten.
    fn insert_one(&self, document: &Value) -> StoreResult<DocumentId>;

    /// Exact-match lookup by identifier.
    fn find_one(&self, id: DocumentId) -> StoreResult<Option<RawDocument>>;

    /// Visits every document in store iteration order.
    ///
    /// The underlying cursor is released before this returns, on both the
    /// success and the error path. Documents visited before an error are
    /// not rolled back from the caller's point of view.
    fn scan(&self, visit: &mut dyn FnMut(RawDocument)) -> StoreResult<()>;

    /// Replaces the whole document with identifier `id`.
    ///
    /// Returns `false` when nothing matched; never inserts.
    fn replace_one(&self, id: DocumentId, document: &Value) -> StoreResult<bool>;

    /// Deletes the document with identifier `id`.
    ///
    /// Returns `false` when nothing matched.
    fn delete_one(&self, id: DocumentId) -> StoreResult<bool>;
}

impl<T: DocumentCollection + ?Sized> DocumentCollection for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn insert_one(&self, document: &Value) -> StoreResult<DocumentId> {
        (**self).insert_one(document)
    }

    fn find_one(&self, id: DocumentId) -> StoreResult<Option<RawDocument>> {
        (**self).find_one(id)
    }

    fn scan(&self, visit: &mut dyn FnMut(RawDocument)) -> StoreResult<()> {
        (**self).scan(visit)
    }

    fn replace_one(&self, id: DocumentId, document: &Value) -> StoreResult<bool> {
        (**self).replace_one(id, document)
    }

    fn delete_one(&self, id: DocumentId) -> StoreResult<bool> {
        (**self).delete_one(id)
    }
}

/// Writes `id` under the reserved key, rejecting non-object bodies.
pub(crate) fn with_document_id(document: &Value, id: DocumentId) -> StoreResult<Value> {
    let mut object = match document {
        Value::Object(map) => map.clone(),
        _ => return Err(StoreError::NotAnObject),
    };
    object.insert(ID_KEY.to_string(), Value::String(id.to_string()));
    Ok(Value::Object(object))
}

#[cfg(test)]
mod tests {
    use super::{parse_document_id, with_document_id, StoreError, ID_KEY};
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn parse_document_id_accepts_hyphenated_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_document_id(&id.to_string()), Some(id));
        assert_eq!(
            parse_document_id(&id.to_string().to_ascii_uppercase()),
            Some(id)
        );
    }

    #[test]
    fn parse_document_id_rejects_garbage() {
        assert!(parse_document_id("not-an-id").is_none());
        assert!(parse_document_id("").is_none());
    }

    #[test]
    fn parse_document_id_rejects_alternate_spellings() {
        let id = Uuid::new_v4();
        let padded = format!(" {id} ");
        let braced = format!("{{{id}}}");
        let simple = id.simple().to_string();
        let urn = id.urn().to_string();

        for text in [padded, braced, simple, urn] {
            assert!(parse_document_id(&text).is_none(), "accepted `{text}`");
        }
    }

    #[test]
    fn with_document_id_overwrites_reserved_key() {
        let id = Uuid::new_v4();
        let doc = with_document_id(&json!({ "_id": "stale", "title": "x" }), id).unwrap();
        assert_eq!(doc[ID_KEY], id.to_string());
        assert_eq!(doc["title"], "x");
    }

    #[test]
    fn with_document_id_rejects_non_objects() {
        let err = with_document_id(&json!([1, 2, 3]), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject));
    }
}
