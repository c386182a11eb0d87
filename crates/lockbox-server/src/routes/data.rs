//! Encrypted record routes: `/data`
//!
//! `POST /data` encrypts through the transit oracle and persists the
//! ciphertext; `GET /data/{id}` fetches and decrypts. Responses carry the
//! rows under a `data` envelope, like every other route family.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use lockbox_core::records::{DecryptedRecord, EncryptedRecord};

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/data` router.
///
/// Paths:
/// - `POST /data` — encrypt and persist a value
/// - `GET  /data/{id}` — fetch and decrypt a record
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_record))
        .route("/{id}", get(get_record))
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    /// Plaintext value to seal.
    pub data: String,
    /// Name of the transit key to seal it under.
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub data: EncryptedRecord,
}

#[derive(Debug, Serialize)]
pub struct DecryptedResponse {
    pub data: DecryptedRecord,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// `POST /data` — encrypt and persist a value.
async fn create_record(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRecordRequest>,
) -> Result<(StatusCode, Json<RecordResponse>), AppError> {
    if body.key.is_empty() {
        return Err(AppError::BadRequest("key is required".to_owned()));
    }

    let record = state.records.create(&body.data, &body.key).await?;

    Ok((StatusCode::CREATED, Json(RecordResponse { data: record })))
}

/// `GET /data/{id}` — fetch a record and return its decrypted view.
async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DecryptedResponse>, AppError> {
    let record = state.records.get(id).await?;

    Ok(Json(DecryptedResponse { data: record }))
}
