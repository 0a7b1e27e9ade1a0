// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Shared library discovery inside store entries.
//!
//! A store entry is walked once per run; the set of relative library paths is
//! cached under the entry's canonical path so that the provides and needs
//! passes (and repeated mentions of the same entry) see the exact same set.

use std::collections::{BTreeSet, HashMap};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::ScanError;

/// Relative paths of the shared libraries found in one store entry.
pub type LibraryPaths = Arc<BTreeSet<PathBuf>>;

/// Check whether a file name follows the shared object naming convention.
///
/// The name must end in a `.so` component, optionally followed by numeric
/// version components: `libfoo.so`, `libfoo.so.1`, `libfoo.so.1.2.3`.
/// Names are compared as raw bytes, so non-UTF-8 names are judged too.
pub fn is_shared_library_name(name: impl AsRef<OsStr>) -> bool {
    let components: Vec<&[u8]> = name.as_ref().as_bytes().split(|&b| b == b'.').collect();
    let is_version = |c: &&[u8]| !c.is_empty() && c.iter().all(u8::is_ascii_digit);
    match components.iter().rposition(|c| !is_version(c)) {
        Some(so) => components[so] == b"so" && components[..so].iter().any(|c| !c.is_empty()),
        None => false,
    }
}

/// Memoizing scanner for shared libraries.
///
/// The cache lives as long as the scanner; create one per run.
#[derive(Debug, Default)]
pub struct LibraryScanner {
    cache: Mutex<HashMap<PathBuf, LibraryPaths>>,
}

impl LibraryScanner {
    pub fn new() -> Self {
        Self::default()
    }

    fn cache(&self) -> MutexGuard<'_, HashMap<PathBuf, LibraryPaths>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the library paths under `store_entry`, relative to its root.
    ///
    /// The entry is resolved strictly (symlinks followed) and must be a
    /// directory. The first result for a resolved root is reused for the
    /// rest of the scanner's lifetime.
    pub fn discover_libraries(&self, store_entry: &Path) -> Result<LibraryPaths, ScanError> {
        let root = fs::canonicalize(store_entry).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ScanError::NotFound {
                    path: store_entry.to_owned(),
                    source,
                }
            } else {
                ScanError::Resolve {
                    path: store_entry.to_owned(),
                    source,
                }
            }
        })?;

        if let Some(libraries) = self.cache().get(&root) {
            return Ok(Arc::clone(libraries));
        }

        if !root.is_dir() {
            return Err(ScanError::NotADirectory {
                path: store_entry.to_owned(),
            });
        }

        // The walk runs without the lock held; a concurrent scan of the same
        // root yields the same set, and the first one inserted wins.
        let libraries = Arc::new(scan_tree(&root)?);
        debug!(
            "Found {} libraries in {}: {:?}",
            libraries.len(),
            store_entry.display(),
            libraries
        );
        Ok(Arc::clone(self.cache().entry(root).or_insert(libraries)))
    }

    /// Number of store entries scanned so far.
    pub fn scanned_entries(&self) -> usize {
        self.cache().len()
    }
}

fn scan_tree(root: &Path) -> Result<BTreeSet<PathBuf>, ScanError> {
    let mut libraries = BTreeSet::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: root.to_owned(),
            source,
        })?;
        if entry.depth() == 0 {
            continue;
        }
        if !is_shared_library_name(entry.file_name()) {
            continue;
        }
        // Symlinks count when they resolve to a regular file; dangling ones
        // are skipped.
        match fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => continue,
            Err(source) if source.kind() == io::ErrorKind::NotFound => continue,
            Err(source) => {
                return Err(ScanError::Metadata {
                    path: entry.path().to_owned(),
                    source,
                });
            }
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            libraries.insert(relative.to_owned());
        }
    }
    Ok(libraries)
}
