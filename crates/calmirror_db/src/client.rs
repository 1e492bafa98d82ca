//! Database client for the mirror store
//!
//! Wraps an `sqlx` Any pool so the store can run on any driver sqlx ships;
//! SQLite is the default.

use crate::error::DbError;
use calmirror_config::{AppConfig, DatabaseConfig};
use sqlx::pool::PoolOptions;
use sqlx::{Pool, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

/// Type alias for a database transaction
pub type DbTransaction<'a> = Transaction<'a, sqlx::Any>;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Database client
#[derive(Debug, Clone)]
pub struct DbClient {
    /// The database connection pool
    pool: Pool<sqlx::Any>,
}

impl DbClient {
    /// Create a new database client from the `database` section of the application config.
    ///
    /// # Errors
    ///
    /// Fails when the section is missing, the URL is empty or the pool cannot connect.
    pub async fn new(config: &AppConfig) -> Result<Self, DbError> {
        let db_config = config
            .database
            .as_ref()
            .ok_or_else(|| DbError::ConfigError("Database configuration is missing".to_string()))?;

        Self::from_config(db_config).await
    }

    /// Create a new database client from a database configuration
    pub async fn from_config(db_config: &DatabaseConfig) -> Result<Self, DbError> {
        let max_connections = db_config
            .max_connections
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        Self::connect(&db_config.url, max_connections).await
    }

    /// Create a new database client from a database URL with the default pool size
    pub async fn from_url(db_url: &str) -> Result<Self, DbError> {
        Self::connect(db_url, DEFAULT_MAX_CONNECTIONS).await
    }

    async fn connect(db_url: &str, max_connections: u32) -> Result<Self, DbError> {
        if db_url.is_empty() {
            return Err(DbError::ConfigError("Database URL is empty".to_string()));
        }

        let pool = Self::create_pool(db_url, max_connections).await?;
        Ok(Self { pool })
    }

    async fn create_pool(db_url: &str, max_connections: u32) -> Result<Pool<sqlx::Any>, DbError> {
        debug!("Creating database pool with URL: {}", db_url);

        sqlx::any::install_default_drivers();

        // Every connection to an in-memory SQLite database gets its own empty
        // database, so the pool must hold exactly one.
        let max_connections = if db_url.contains(":memory:") {
            1
        } else {
            max_connections.max(1)
        };

        let mut pool_options = PoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3));
        if max_connections == 1 {
            // Dropping the last in-memory connection discards the database.
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        } else {
            pool_options = pool_options.idle_timeout(Duration::from_secs(600));
        }

        if db_url.starts_with("sqlite:") {
            prepare_sqlite_file(db_url)?;
        }

        let options = sqlx::any::AnyConnectOptions::from_str(db_url).map_err(|e| {
            error!("Invalid database URL: {}", e);
            DbError::ConfigError(e.to_string())
        })?;

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            error!("Failed to create database pool: {}", e);
            DbError::PoolError(e.to_string())
        })?;

        info!(
            "Database pool created successfully (max_connections = {})",
            max_connections
        );
        Ok(pool)
    }

    /// Get the database connection pool
    pub fn pool(&self) -> &Pool<sqlx::Any> {
        &self.pool
    }

    /// Begin a transaction
    pub async fn begin(&self) -> Result<DbTransaction<'_>, DbError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))
    }

    /// Execute a statement that returns no rows, yielding the number of rows affected
    pub async fn execute(&self, query: &str) -> Result<u64, DbError> {
        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    /// Check if the database answers a trivial query
    pub async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// The Any driver cannot set `create_if_missing`, so a file-backed SQLite
/// database and its directory are created up front.
fn prepare_sqlite_file(db_url: &str) -> Result<(), DbError> {
    let db_path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    // Drop query parameters such as `?mode=rwc`.
    let db_path = db_path.split('?').next().unwrap_or(db_path);

    if db_path.is_empty() || db_path.contains(":memory:") {
        return Ok(());
    }

    let path = Path::new(db_path);
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            debug!("Creating directory for SQLite database: {:?}", dir);
            std::fs::create_dir_all(dir).map_err(|e| {
                error!("Failed to create directory for SQLite database: {}", e);
                DbError::PoolError(format!("Failed to create directory: {}", e))
            })?;
        }
    }

    if !path.exists() {
        debug!("Creating empty SQLite database file: {}", db_path);
        std::fs::File::create(path).map_err(|e| {
            error!("Failed to create SQLite database file: {}", e);
            DbError::PoolError(format!("Failed to create database file: {}", e))
        })?;
    }

    Ok(())
}
