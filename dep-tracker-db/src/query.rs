// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Ordered read-back of the linkage relations.
//!
//! Rows come back sorted by their full key tuple so dumps are deterministic
//! regardless of insertion order.

use crate::connection::DepDb;
use crate::error::Result;
use crate::types::{Artifact, Needs, Provides};

impl DepDb {
    /// All artifacts, ordered by path.
    pub fn query_artifacts(&self) -> Result<Vec<Artifact>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT path, classification
            FROM artifacts
            ORDER BY path
            "#,
        )?;

        let mut artifacts = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            artifacts.push(Artifact {
                path: row.get(0)?,
                classification: row.get(1)?,
            });
        }
        Ok(artifacts)
    }

    /// All provides rows, ordered by (artifact, library_path, library_name).
    pub fn query_provides(&self) -> Result<Vec<Provides>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT artifact, library_path, library_name
            FROM provides
            ORDER BY artifact, library_path, library_name
            "#,
        )?;

        let mut provides = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            provides.push(Provides {
                artifact: row.get(0)?,
                library_path: row.get(1)?,
                library_name: row.get(2)?,
            });
        }
        Ok(provides)
    }

    /// All needs rows, ordered by (artifact, library_path, library_name).
    pub fn query_needs(&self) -> Result<Vec<Needs>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT artifact, library_path, library_name
            FROM needs
            ORDER BY artifact, library_path, library_name
            "#,
        )?;

        let mut needs = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            needs.push(Needs {
                artifact: row.get(0)?,
                library_path: row.get(1)?,
                library_name: row.get(2)?,
            });
        }
        Ok(needs)
    }

    /// Package set an artifact was recorded under, if any.
    pub fn query_classification(&self, path: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT classification FROM artifacts WHERE path = ?1")?;

        match stmt.query_row([path], |row| row.get(0)) {
            Ok(classification) => Ok(Some(classification)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Count the rows of one of the linkage tables.
    pub fn count_rows(&self, table: Table) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// The linkage tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Artifacts,
    Provides,
    Needs,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Artifacts => "artifacts",
            Table::Provides => "provides",
            Table::Needs => "needs",
        }
    }
}
