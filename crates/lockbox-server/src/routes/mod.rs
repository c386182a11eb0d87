//! HTTP route handlers.
//!
//! Two route families: `/data` (encrypted records) and `/folders`
//! (hierarchical resources, with `/projects` nested under each folder).

pub mod data;
pub mod folders;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Build the application router with its state applied.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/data", data::router())
        .nest("/folders", folders::router())
        .with_state(state)
}
