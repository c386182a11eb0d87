//! Encrypted record store — the envelope-encryption data path.
//!
//! Writes encrypt first and persist second: when the oracle call fails, no
//! row is written, and plaintext is never stored as a fallback. Reads fetch
//! the ciphertext plus the key name it was sealed under and decrypt through
//! the oracle; a decrypt failure is surfaced, never papered over by
//! returning ciphertext.
//!
//! The stored `keyname` is the only key ever used to decrypt a row — that
//! pairing is a schema-level assumption, not something validated per read.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::db::Database;
use crate::error::{RecordError, StoreError};
use crate::transit::TransitClient;

/// A persisted record. `data` is ciphertext produced by the transit oracle.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct EncryptedRecord {
    pub id: i64,
    pub data: String,
    #[serde(rename = "key")]
    pub keyname: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Transient decrypted view of a record. Exists only in responses, never in
/// storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecryptedRecord {
    pub id: i64,
    pub data: String,
    pub created_at: String,
}

/// Store composing the storage adapter and the transit client.
#[derive(Clone)]
pub struct RecordStore {
    db: Database,
    transit: Arc<dyn TransitClient>,
}

impl RecordStore {
    #[must_use]
    pub fn new(db: Database, transit: Arc<dyn TransitClient>) -> Self {
        Self { db, transit }
    }

    /// Encrypt `plaintext` under the named key and persist the result.
    ///
    /// The insert is gated on a successful oracle round trip. No transaction
    /// spans the two steps: when the insert fails after encryption succeeded
    /// the ciphertext is discarded and the failure logged — there is nothing
    /// to compensate because nothing was written.
    ///
    /// # Errors
    ///
    /// - [`RecordError::Transit`] when the oracle call fails (no row is
    ///   written).
    /// - [`RecordError::Store`] when the insert fails.
    pub async fn create(
        &self,
        plaintext: &str,
        key_name: &str,
    ) -> Result<EncryptedRecord, RecordError> {
        let sealed = self.transit.encrypt(plaintext, key_name).await?;
        let now = now_iso();

        let record = sqlx::query_as::<_, EncryptedRecord>(
            r"INSERT INTO data (data, keyname, created_at)
              VALUES (?, ?, ?)
              RETURNING id, data, keyname, created_at, updated_at",
        )
        .bind(&sealed.ciphertext)
        .bind(key_name)
        .bind(&now)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                key = %key_name,
                "insert failed after successful encrypt; ciphertext discarded"
            );
            StoreError::from(e)
        })?;

        tracing::debug!(id = record.id, key = %key_name, "record created");
        Ok(record)
    }

    /// Fetch the record with `id` and decrypt it with its stored key name.
    ///
    /// # Errors
    ///
    /// - [`RecordError::Store`] with [`StoreError::NotFound`] when no row
    ///   matches.
    /// - [`RecordError::Transit`] when decryption fails — the stored
    ///   ciphertext is left untouched.
    pub async fn get(&self, id: i64) -> Result<DecryptedRecord, RecordError> {
        let row = sqlx::query_as::<_, EncryptedRecord>(
            "SELECT id, data, keyname, created_at, updated_at FROM data WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(StoreError::from)?
        .ok_or(StoreError::NotFound {
            resource: format!("record {id}"),
        })?;

        let plaintext = self.transit.decrypt(&row.data, &row.keyname).await?;

        Ok(DecryptedRecord {
            id: row.id,
            data: plaintext,
            created_at: row.created_at,
        })
    }
}

/// Current instant as an ISO-8601 string with millisecond precision, matching
/// the varchar timestamp columns.
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
