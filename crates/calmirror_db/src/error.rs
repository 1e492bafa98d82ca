//! Error types for the mirror store

use calmirror_common::CalmirrorError;
use thiserror::Error;

/// Errors that can occur when working with the mirror store
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// A unique key is already taken
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// A stored value could not be turned back into a model
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

impl From<DbError> for CalmirrorError {
    fn from(err: DbError) -> Self {
        CalmirrorError::DatabaseError(err.to_string())
    }
}

/// Maps a query error, telling unique-constraint violations apart.
pub(crate) fn classify(err: sqlx::Error) -> DbError {
    let unique = err
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if unique {
        DbError::Duplicate(err.to_string())
    } else {
        DbError::QueryError(err.to_string())
    }
}
