//! Shared application state.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the two stores, which in turn share the
//! one database handle created in `main` — the handle is never replaced
//! after initialization.

use lockbox_core::folders::FolderStore;
use lockbox_core::records::RecordStore;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Envelope-encrypted record store (`/data`).
    pub records: RecordStore,
    /// Folder/project store (`/folders`).
    pub folders: FolderStore,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
