//! Core library for Lockbox.
//!
//! Lockbox persists opaque values while delegating all cryptography to a
//! remote transit-encryption oracle. This crate holds everything with real
//! design content:
//!
//! - [`db`] — the SQLite storage adapter (single shared connection,
//!   parameter-bound statements, typed constraint classification).
//! - [`transit`] — the [`transit::TransitClient`] capability and its HTTP
//!   implementation against a Vault-style `/v1/transit` API.
//! - [`records`] — the envelope-encryption data path: encrypt-then-insert on
//!   write, fetch-then-decrypt on read. Plaintext is never persisted.
//! - [`folders`] — the folder/project hierarchy with unique names and
//!   restrict-delete referential integrity.
//!
//! The HTTP surface lives in `lockbox-server` and maps the typed errors in
//! [`error`] onto status codes.

pub mod db;
pub mod error;
pub mod folders;
pub mod records;
pub mod transit;
