//! SQLite-backed document collection.
//!
//! # Responsibility
//! - Store JSON documents in the shared `documents` table, partitioned by
//!   collection name.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - `(collection, id)` is unique; ids are UUID v4 generated on insert.
//! - Scan order is insertion order (`seq`), which replaces do not change.

use super::{with_document_id, DocumentCollection, DocumentId, RawDocument, StoreError, StoreResult};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection};
use serde_json::Value;
use uuid::Uuid;

/// Collection handle over a migrated SQLite connection.
pub struct SqliteCollection<'conn> {
    conn: &'conn Connection,
    name: String,
}

impl<'conn> SqliteCollection<'conn> {
    /// Binds a collection name to a connection returned by `open_db*`.
    ///
    /// # Errors
    /// - `DbError::UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection, name: impl Into<String>) -> StoreResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::Db(DbError::UninitializedConnection {
                expected_version,
                actual_version,
            }));
        }

        Ok(Self {
            conn,
            name: name.into(),
        })
    }

    /// Returns the number of documents currently in this collection.
    pub fn count(&self) -> StoreResult<u64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1;",
            [self.name.as_str()],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

impl DocumentCollection for SqliteCollection<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn insert_one(&self, document: &Value) -> StoreResult<DocumentId> {
        let id = Uuid::new_v4();
        let body = encode_body(&with_document_id(document, id)?)?;

        self.conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3);",
            params![self.name.as_str(), id.to_string(), body],
        )?;

        Ok(id)
    }

    fn find_one(&self, id: DocumentId) -> StoreResult<Option<RawDocument>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, body
             FROM documents
             WHERE collection = ?1 AND id = ?2;",
        )?;

        let mut rows = stmt.query(params![self.name.as_str(), id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(RawDocument {
                id: row.get(0)?,
                body: row.get(1)?,
            }));
        }

        Ok(None)
    }

    fn scan(&self, visit: &mut dyn FnMut(RawDocument)) -> StoreResult<()> {
        let mut stmt = self.conn.prepare(
            "SELECT id, body
             FROM documents
             WHERE collection = ?1
             ORDER BY seq ASC;",
        )?;

        let mut rows = stmt.query([self.name.as_str()])?;
        while let Some(row) = rows.next()? {
            visit(RawDocument {
                id: row.get(0)?,
                body: row.get(1)?,
            });
        }

        Ok(())
    }

    fn replace_one(&self, id: DocumentId, document: &Value) -> StoreResult<bool> {
        let body = encode_body(&with_document_id(document, id)?)?;

        let changed = self.conn.execute(
            "UPDATE documents
             SET
                body = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE collection = ?1 AND id = ?2;",
            params![self.name.as_str(), id.to_string(), body],
        )?;

        Ok(changed > 0)
    }

    fn delete_one(&self, id: DocumentId) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2;",
            params![self.name.as_str(), id.to_string()],
        )?;

        Ok(changed > 0)
    }
}

fn encode_body(document: &Value) -> StoreResult<String> {
    serde_json::to_string(document).map_err(StoreError::Encode)
}
