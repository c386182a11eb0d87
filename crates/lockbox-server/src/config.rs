//! Server configuration.
//!
//! Loaded once from environment variables at process start. The transit
//! oracle settings are validated here rather than on first use, so a missing
//! address or token fails the boot instead of the first request.

use std::net::SocketAddr;

use anyhow::Context;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Path of the SQLite database file.
    pub database_path: String,
    /// Base URL of the transit oracle (e.g. `http://127.0.0.1:8200`).
    pub vault_addr: String,
    /// Token sent as `X-Vault-Token` on every oracle call.
    pub vault_token: String,
    /// Log level filter (e.g. `info`, `debug`).
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `VAULT_ADDR` — transit oracle base URL (**required**)
    /// - `VAULT_TOKEN` — transit oracle token (**required**)
    /// - `LOCKBOX_BIND_ADDR` — full bind address (overrides `PORT`)
    /// - `PORT` — port to bind on `0.0.0.0` (default: `127.0.0.1:3001`)
    /// - `LOCKBOX_DB_PATH` — SQLite file path (default: `./lockbox.db`)
    /// - `LOCKBOX_LOG_LEVEL` — log filter (default: `info`)
    ///
    /// # Errors
    ///
    /// Fails when the oracle settings are absent or an address/port does not
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        let vault_addr = std::env::var("VAULT_ADDR")
            .context("VAULT_ADDR must be set to the transit oracle base URL")?;
        let vault_token =
            std::env::var("VAULT_TOKEN").context("VAULT_TOKEN must be set")?;

        // Priority: LOCKBOX_BIND_ADDR > PORT > default 127.0.0.1:3001
        let bind_addr = if let Ok(addr) = std::env::var("LOCKBOX_BIND_ADDR") {
            addr.parse()
                .context("LOCKBOX_BIND_ADDR is not a valid socket address")?
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().context("PORT is not a valid port")?;
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 3001))
        };

        let database_path =
            std::env::var("LOCKBOX_DB_PATH").unwrap_or_else(|_| "./lockbox.db".to_owned());

        let log_level =
            std::env::var("LOCKBOX_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        Ok(Self {
            bind_addr,
            database_path,
            vault_addr,
            vault_token,
            log_level,
        })
    }
}
