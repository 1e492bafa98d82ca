//! The SQL-backed mirror store
//!
//! One [`SqlStore`] implements every repository trait over a shared
//! [`DbClient`], so accounts, mirror rows and mappings live in one database.

use crate::error::DbError;
use crate::DbClient;
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        google_id TEXT NOT NULL,
        access_token TEXT NOT NULL,
        refresh_token TEXT,
        expiry_date TEXT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS mirror_events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id TEXT NOT NULL,
        provider_event_id TEXT NOT NULL,
        mapping_id TEXT,
        title TEXT NOT NULL,
        start_date TEXT NOT NULL,
        start_time TEXT,
        end_date TEXT NOT NULL,
        end_time TEXT,
        deleted INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(account_id, provider_event_id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_mirror_events_account_deleted
        ON mirror_events(account_id, deleted)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS field_mappings (
        id TEXT PRIMARY KEY,
        account_id TEXT NOT NULL,
        columns TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_field_mappings_one_active
        ON field_mappings(account_id) WHERE is_active = 1
    "#,
];

/// SQL implementation of the account, mirror event and field mapping repositories
#[derive(Debug, Clone)]
pub struct SqlStore {
    pub(crate) db_client: DbClient,
}

impl SqlStore {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    /// Creates the tables and indexes if they don't already exist.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing mirror store schema");
        for statement in SCHEMA {
            self.db_client.execute(statement).await?;
        }
        info!("Mirror store schema initialized successfully");
        Ok(())
    }

    pub fn client(&self) -> &DbClient {
        &self.db_client
    }
}
