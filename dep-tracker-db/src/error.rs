// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Error types for dependency database operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for dependency database operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during dependency database operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to open database with context
    #[error("Failed to open database at '{path}': {source}")]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database file not found
    #[error("Database not found at: {0}")]
    DatabaseNotFound(PathBuf),

    /// The tables already exist; every run starts from an empty database.
    #[error("Database already contains the dependency tables")]
    SchemaExists,

    /// A bulk insert violated a primary-key or foreign-key constraint.
    #[error("Integrity violation while inserting into {table}: {source}")]
    Constraint {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl Error {
    /// Whether this error is a store-level constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Error::Constraint { .. })
    }
}
