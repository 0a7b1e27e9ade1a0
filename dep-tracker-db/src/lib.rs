// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! SQLite relations for shared-library linkage facts.
//!
//! Three tables are kept per run:
//!
//! - `artifacts`: every store entry and the package set it was listed under
//! - `provides`: the shared libraries an artifact ships
//! - `needs`: the `DT_NEEDED` entries of those libraries
//!
//! Both fact tables reference `artifacts(path)`; foreign keys are enforced on
//! every connection opened through [`DepDb`].
//!
//! # Example
//!
//! ```ignore
//! use dep_tracker_db::{DepDb, OpenMode};
//!
//! let mut db = DepDb::open("deps.sqlite", OpenMode::Create)?;
//! db.create_schema()?;
//! db.insert_artifacts(&artifacts)?;
//! for row in db.query_provides()? {
//!     println!("{} {}", row.artifact, row.library_name);
//! }
//! ```

mod connection;
mod error;
mod query;
mod schema;
mod types;
mod write;

pub use connection::{DepDb, OpenMode};
pub use error::{Error, Result};
pub use query::Table;
pub use schema::TABLES;
pub use types::*;
