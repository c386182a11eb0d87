//! Lockbox HTTP server.
//!
//! Wires the core library into a running Axum server: `/data` for
//! envelope-encrypted records, `/folders` (with nested `/projects`) for the
//! hierarchical resources. Typed domain errors are mapped onto HTTP status
//! codes in [`error`].

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
