//! Server Configuration
//!
//! This module handles loading server configuration from environment
//! variables and initializing the database pool.
//!
//! # Configuration Sources
//!
//! Configuration is loaded from environment variables, with sensible
//! defaults for local development.
//!
//! # Error Handling
//!
//! The store is mandatory: a database that cannot be opened fails startup.
//! Optional collaborators (summary service, activity log) that are not
//! configured are set to `None` and the server runs without them.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://confab.db";

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on (`SERVER_PORT`)
    pub port: u16,
    /// SQLite database URL (`DATABASE_URL`)
    pub database_url: String,
    /// Summary collaborator endpoint (`SUMMARY_SERVICE_URL`), if configured
    pub summary_service_url: Option<String>,
    /// Whether the tracing activity log is enabled (`ACTIVITY_LOG`)
    pub activity_log: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let summary_service_url = std::env::var("SUMMARY_SERVICE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let activity_log = std::env::var("ACTIVITY_LOG")
            .map(|raw| raw != "0" && !raw.eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        Self {
            port,
            database_url,
            summary_service_url,
            activity_log,
        }
    }
}

/// Open the database pool and run migrations
///
/// The database file is created if missing. Migration failure is fatal:
/// the store is the source of truth and the server does not run without it.
pub async fn connect_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("Connecting to database at {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}
