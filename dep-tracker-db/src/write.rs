// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Bulk insert operations.
//!
//! Each bulk insert runs in its own transaction: either every row of the
//! batch is committed or none is. There is no transaction spanning several
//! relations, so a failure in a later batch leaves earlier batches in place.

use rusqlite::{ErrorCode, Statement, params};
use tracing::debug;

use crate::connection::DepDb;
use crate::error::{Error, Result};
use crate::types::{Artifact, Needs, Provides};

/// Turn constraint failures into [`Error::Constraint`] tagged with the table.
fn insert_error(table: &'static str, e: rusqlite::Error) -> Error {
    match e.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => Error::Constraint { table, source: e },
        _ => Error::Sqlite(e),
    }
}

impl DepDb {
    fn bulk_insert<T, F>(
        &mut self,
        table: &'static str,
        sql: &str,
        rows: &[T],
        mut bind: F,
    ) -> Result<usize>
    where
        F: FnMut(&mut Statement<'_>, &T) -> rusqlite::Result<usize>,
    {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(sql)?;
            for row in rows {
                bind(&mut stmt, row).map_err(|e| insert_error(table, e))?;
            }
        }
        tx.commit()?;
        debug!("Inserted {} rows into {table}", rows.len());
        Ok(rows.len())
    }

    /// Insert artifact rows.
    ///
    /// An artifact listed twice (even under different package sets) is a
    /// primary key violation.
    pub fn insert_artifacts(&mut self, rows: &[Artifact]) -> Result<usize> {
        self.bulk_insert(
            "artifacts",
            "INSERT INTO artifacts (path, classification) VALUES (?1, ?2)",
            rows,
            |stmt, row| stmt.execute(params![row.path, row.classification]),
        )
    }

    /// Insert provides rows. Every artifact must already be present.
    pub fn insert_provides(&mut self, rows: &[Provides]) -> Result<usize> {
        self.bulk_insert(
            "provides",
            "INSERT INTO provides (artifact, library_path, library_name) VALUES (?1, ?2, ?3)",
            rows,
            |stmt, row| stmt.execute(params![row.artifact, row.library_path, row.library_name]),
        )
    }

    /// Insert needs rows. Every artifact must already be present.
    pub fn insert_needs(&mut self, rows: &[Needs]) -> Result<usize> {
        self.bulk_insert(
            "needs",
            "INSERT INTO needs (artifact, library_path, library_name) VALUES (?1, ?2, ?3)",
            rows,
            |stmt, row| stmt.execute(params![row.artifact, row.library_path, row.library_name]),
        )
    }
}
