//! HTTP error types for the Lockbox server.
//!
//! Maps domain errors from `lockbox-core` into HTTP responses. Every error
//! variant produces a JSON body with a machine-readable `error` field and a
//! human-readable `message`. Internal detail (driver errors, oracle
//! transport failures) is logged and replaced with a generic message — it is
//! never echoed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lockbox_core::error::{RecordError, StoreError, TransitError};

/// Application-level error returned from HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Requested resource not found.
    NotFound(String),
    /// Client sent invalid input (including restrict-delete violations and
    /// unknown transit keys).
    BadRequest(String),
    /// A uniqueness conflict.
    Conflict(String),
    /// Internal server error — detail already logged.
    Internal(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::DuplicateName { .. } => Self::Conflict(err.to_string()),
            StoreError::ReferentialIntegrity { .. } => Self::BadRequest(err.to_string()),
            StoreError::ConnectionNotReady { .. } | StoreError::Persistence { .. } => {
                tracing::error!(error = %err, "storage failure");
                Self::Internal("storage failure".to_owned())
            }
        }
    }
}

impl From<TransitError> for AppError {
    fn from(err: TransitError) -> Self {
        match err {
            TransitError::UnknownKey { .. } => Self::BadRequest(err.to_string()),
            TransitError::EncryptionUnavailable { .. } => {
                tracing::error!(error = %err, "transit encrypt failed");
                Self::Internal("unable to encrypt".to_owned())
            }
            TransitError::DecryptionUnavailable { .. } => {
                tracing::error!(error = %err, "transit decrypt failed");
                Self::Internal("unable to decrypt".to_owned())
            }
        }
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Transit(e) => e.into(),
            RecordError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn store_errors_map_to_expected_statuses() {
        assert_eq!(
            status_of(
                StoreError::NotFound {
                    resource: "folder 'x'".to_owned()
                }
                .into()
            ),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(
                StoreError::DuplicateName {
                    name: "x".to_owned()
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(
                StoreError::ReferentialIntegrity {
                    name: "x".to_owned()
                }
                .into()
            ),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(
                StoreError::Persistence {
                    reason: "disk io".to_owned()
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(
                StoreError::ConnectionNotReady {
                    reason: "pool closed".to_owned()
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn transit_errors_map_to_expected_statuses() {
        assert_eq!(
            status_of(TransitError::UnknownKey { key: "k".to_owned() }.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(
                TransitError::EncryptionUnavailable {
                    reason: "down".to_owned()
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(
                TransitError::DecryptionUnavailable {
                    reason: "down".to_owned()
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_not_echoed() {
        let app: AppError = StoreError::Persistence {
            reason: "UNIQUE constraint failed: secret internals".to_owned(),
        }
        .into();
        let AppError::Internal(msg) = app else {
            panic!("expected Internal");
        };
        assert_eq!(msg, "storage failure");
    }
}
