// crates/db/src/store.rs
//! Bucketed record store.
//!
//! Each entity type lives in its own bucket and is addressed by a natural
//! key. Records are JSON documents; updates are shallow merges of a typed
//! patch over the stored record. Every mutation is a single transaction.

use crate::{Database, DbError, DbResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Named partition of the store holding one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Projects,
    Editors,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Editors => "editors",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity type the store can hold.
pub trait Record: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync {
    const BUCKET: Bucket;

    /// Partial update accepted by [`Database::upsert`].
    type Patch: Send + Sync;

    /// Natural key of a stored record.
    fn key(&self) -> &str;

    /// Key a patch targets.
    ///
    /// # Errors
    /// Returns the name of the first mandatory field the patch lacks.
    fn patch_key(patch: &Self::Patch) -> Result<&str, &'static str>;

    /// Full record from a patch, defaults for unset fields.
    fn from_patch(patch: &Self::Patch) -> Self;

    /// Overwrite the fields the patch sets, keep the rest.
    fn merge(&mut self, patch: &Self::Patch);
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed; the patch became a new one.
    Created,
    /// The stored record was merged with the patch and rewritten.
    Updated,
    /// The merge produced the stored record again; nothing was written.
    Unchanged,
}

fn decode<R: Record>(key: &str, value: &str) -> DbResult<R> {
    serde_json::from_str(value).map_err(|source| DbError::Decode {
        bucket: R::BUCKET.as_str(),
        key: key.to_string(),
        source,
    })
}

fn encode<R: Record>(key: &str, record: &R) -> DbResult<String> {
    serde_json::to_string(record).map_err(|source| DbError::Encode {
        bucket: R::BUCKET.as_str(),
        key: key.to_string(),
        source,
    })
}

impl Database {
    /// Fetch one record by key.
    pub async fn get<R: Record>(&self, key: &str) -> DbResult<Option<R>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM records WHERE bucket = ? AND key = ?")
                .bind(R::BUCKET.as_str())
                .bind(key)
                .fetch_optional(self.pool())
                .await?;

        row.map(|(value,)| decode(key, &value)).transpose()
    }

    /// Fetch every record in the bucket, ordered by key.
    ///
    /// # Errors
    /// Returns `DbError::NoRecords` when the bucket is empty.
    pub async fn get_all<R: Record>(&self) -> DbResult<Vec<R>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT key, value FROM records WHERE bucket = ? ORDER BY key")
                .bind(R::BUCKET.as_str())
                .fetch_all(self.pool())
                .await?;

        if rows.is_empty() {
            return Err(DbError::NoRecords {
                bucket: R::BUCKET.as_str(),
            });
        }

        rows.iter()
            .map(|(key, value)| decode(key, value))
            .collect()
    }

    /// Create or shallow-merge the record a patch targets.
    ///
    /// # Errors
    /// Returns `DbError::MissingRequiredField` if the patch lacks a key field.
    pub async fn upsert<R: Record>(&self, patch: &R::Patch) -> DbResult<UpsertOutcome> {
        let key = R::patch_key(patch).map_err(|field| DbError::MissingRequiredField {
            bucket: R::BUCKET.as_str(),
            field,
        })?;

        let mut tx = self.pool().begin().await?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT value FROM records WHERE bucket = ? AND key = ?")
                .bind(R::BUCKET.as_str())
                .bind(key)
                .fetch_optional(&mut *tx)
                .await?;

        let (record, outcome) = match existing {
            None => (R::from_patch(patch), UpsertOutcome::Created),
            Some((value,)) => {
                let stored: R = decode(key, &value)?;
                let mut merged = stored.clone();
                merged.merge(patch);
                if merged == stored {
                    tx.commit().await?;
                    return Ok(UpsertOutcome::Unchanged);
                }
                (merged, UpsertOutcome::Updated)
            }
        };

        sqlx::query(
            r#"INSERT INTO records (bucket, key, value) VALUES (?, ?, ?)
               ON CONFLICT(bucket, key) DO UPDATE SET value = excluded.value"#,
        )
        .bind(R::BUCKET.as_str())
        .bind(record.key())
        .bind(encode(key, &record)?)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(outcome)
    }

    /// Delete a record. Deleting a missing key is not an error; the return
    /// value says whether anything was removed.
    pub async fn delete<R: Record>(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM records WHERE bucket = ? AND key = ?")
            .bind(R::BUCKET.as_str())
            .bind(key)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Keys of every record in the bucket, ordered. Values are not decoded,
    /// so unreadable records are still listed.
    pub async fn keys<R: Record>(&self) -> DbResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT key FROM records WHERE bucket = ? ORDER BY key")
                .bind(R::BUCKET.as_str())
                .fetch_all(self.pool())
                .await?;
        Ok(rows.into_iter().map(|(key,)| key).collect())
    }
}
