// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database row types for linkage facts.

use std::path::Path;

use serde::Serialize;

/// A store entry together with the package set it was listed under.
///
/// This represents a row from the `artifacts` table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Artifact {
    /// Store path as given by the input (e.g., /nix/store/xxx-name)
    pub path: String,
    /// Package set name (e.g., `pkgsHostTarget`)
    pub classification: String,
}

/// A shared library shipped by an artifact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Provides {
    /// Store path of the artifact
    pub artifact: String,
    /// Library path relative to the artifact root
    pub library_path: String,
    /// Final component of `library_path`
    pub library_name: String,
}

impl Provides {
    /// Build a provides row, deriving the name from the relative path.
    pub fn new(artifact: impl Into<String>, library_path: &Path) -> Self {
        Self {
            artifact: artifact.into(),
            library_path: library_path.to_string_lossy().into_owned(),
            library_name: library_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// A load-time dependency declared by one of an artifact's libraries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Needs {
    /// Store path of the artifact
    pub artifact: String,
    /// Path of the requiring library relative to the artifact root
    pub library_path: String,
    /// Raw `DT_NEEDED` entry, not necessarily a file name of any provides row
    pub library_name: String,
}
