// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Provides and needs facts for a single store entry.

use std::collections::BTreeSet;
use std::path::Path;

use dep_tracker_db::{Needs, Provides};
use tracing::debug;

use crate::elf::ElfReader;
use crate::error::ExtractError;
use crate::scanner::LibraryScanner;

/// Turns store entries into linkage facts.
///
/// Both passes share one [`LibraryScanner`], so the needs of an entry are
/// always read for exactly the libraries it provides.
pub struct Extractor<R> {
    scanner: LibraryScanner,
    reader: R,
}

impl<R: ElfReader> Extractor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            scanner: LibraryScanner::new(),
            reader,
        }
    }

    pub fn scanner(&self) -> &LibraryScanner {
        &self.scanner
    }

    /// One row per library shipped by `store_entry`.
    pub fn get_provides(&self, store_entry: &Path) -> Result<Vec<Provides>, ExtractError> {
        let libraries = self.scanner.discover_libraries(store_entry)?;
        let artifact = store_entry.to_string_lossy();
        Ok(libraries
            .iter()
            .map(|library| Provides::new(&*artifact, library))
            .collect())
    }

    /// One row per distinct library name each shipped library declares as needed.
    ///
    /// Stops at the first library whose dependencies cannot be read; no rows
    /// are returned for the entry in that case.
    pub fn get_needs(&self, store_entry: &Path) -> Result<Vec<Needs>, ExtractError> {
        let libraries = self.scanner.discover_libraries(store_entry)?;
        let artifact = store_entry.to_string_lossy();

        let mut needs = Vec::new();
        for library in libraries.iter() {
            let needed: BTreeSet<String> = self
                .reader
                .needed_libraries(&store_entry.join(library))
                .map_err(|source| ExtractError::Needs {
                    store_entry: store_entry.to_owned(),
                    source,
                })?
                .into_iter()
                .collect();
            debug!("Dependencies for {}: {:?}", library.display(), needed);

            let library_path = library.to_string_lossy();
            needs.extend(needed.into_iter().map(|library_name| Needs {
                artifact: artifact.to_string(),
                library_path: library_path.to_string(),
                library_name,
            }));
        }
        Ok(needs)
    }
}
