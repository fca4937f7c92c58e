//! Server settings loaded via OrthoConfig, and the runtime configuration
//! derived from them.

use std::env;
use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use student_records::outbound::persistence::DbPool;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DATABASE_URL_FALLBACK: &str = "DATABASE_URL";

/// Settings controlling the HTTP listener and storage backend.
///
/// Every field can be set with a `STUDENTS_`-prefixed environment variable
/// (for example `STUDENTS_PORT=9000`) or the matching CLI flag.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STUDENTS")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL. Falls back to `DATABASE_URL`; when neither is set the
    /// server keeps records in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Skip embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl ServerSettings {
    pub fn host(&self) -> &str {
        self.host
            .as_deref()
            .filter(|host| !host.trim().is_empty())
            .unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Resolve the listener address.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidInput` I/O error when the host is not an IP literal.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let host = self.host();
        let ip = host.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind host {host:?}: {err}"),
            )
        })?;
        Ok(SocketAddr::new(ip, self.port()))
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// The configured database URL, falling back to `DATABASE_URL`.
    pub fn database_url(&self) -> Option<String> {
        resolve_database_url(
            self.database_url.as_deref(),
            env::var(DATABASE_URL_FALLBACK).ok(),
        )
    }
}

fn resolve_database_url(explicit: Option<&str>, fallback: Option<String>) -> Option<String> {
    explicit
        .map(str::to_owned)
        .or(fallback)
        .filter(|url| !url.trim().is_empty())
}

/// Runtime configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
        }
    }

    /// Back the student ports with PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
