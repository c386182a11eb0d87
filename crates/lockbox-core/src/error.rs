//! Error types for `lockbox-core`.
//!
//! Each variant carries enough context to diagnose the problem without a
//! debugger. Transit errors never include plaintext or key material — only
//! key names and transport-level descriptions.

/// Errors from the transit-encryption oracle client.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// The named key does not exist on the oracle side.
    #[error("transit key '{key}' does not exist on the oracle")]
    UnknownKey { key: String },

    /// The encrypt round trip failed (network, non-success status, or a
    /// malformed response body).
    #[error("encryption unavailable: {reason}")]
    EncryptionUnavailable { reason: String },

    /// The decrypt round trip failed (network, non-success status, or a
    /// malformed response body).
    #[error("decryption unavailable: {reason}")]
    DecryptionUnavailable { reason: String },
}

/// Errors from the storage layer and the stores built on it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No usable database connection (pool closed or acquisition timed out).
    #[error("database connection is not ready: {reason}")]
    ConnectionNotReady { reason: String },

    /// The requested row does not exist.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// An insert violated a uniqueness constraint.
    #[error("name '{name}' is already taken")]
    DuplicateName { name: String },

    /// A delete was blocked because child rows still reference the target
    /// (restrict policy — deletion never cascades).
    #[error("folder '{name}' still has projects attached")]
    ReferentialIntegrity { name: String },

    /// Any other storage failure.
    #[error("storage operation failed: {reason}")]
    Persistence { reason: String },
}

impl From<sqlx::Error> for StoreError {
    /// Fallback classification for sqlx errors.
    ///
    /// Constraint violations are classified at the call sites that know which
    /// constraint they can hit (see [`crate::db::is_unique_violation`] and
    /// [`crate::db::is_foreign_key_violation`]); everything that reaches this
    /// impl is either a connection problem or a generic persistence failure.
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => Self::ConnectionNotReady {
                reason: err.to_string(),
            },
            other => Self::Persistence {
                reason: other.to_string(),
            },
        }
    }
}

/// Errors from the encrypted record store, which composes the transit client
/// and the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The oracle round trip failed.
    #[error(transparent)]
    Transit(#[from] TransitError),

    /// The storage step failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
