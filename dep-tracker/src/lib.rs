// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Shared-library linkage facts for store entries.
//!
//! For each store entry listed under a package set, the libraries it ships
//! (`provides`) and the libraries those load (`needs`) are recorded in a
//! SQLite database, ready for checking declared dependencies against actual
//! linkage.

pub mod cli;
pub mod config;
pub mod elf;
pub mod error;
pub mod extract;
pub mod inputs;
pub mod logging;
pub mod model;
pub mod package_set;
pub mod scanner;
pub mod tracker;

pub use elf::{ElfReader, PatchelfReader};
pub use error::{Error, Result};
pub use extract::Extractor;
pub use model::{DependencyModel, build_model, populate};
pub use package_set::{DependencyArray, PackageSet, PackageSetDeps};
pub use scanner::LibraryScanner;
