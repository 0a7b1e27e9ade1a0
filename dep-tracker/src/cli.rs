// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Command line interface.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;

use crate::package_set::PackageSet;

/// Creates a database of the shared-library dependencies of store entries.
#[derive(Parser, Debug, Clone)]
#[command(name = "dep-tracker", version, about, long_about = None)]
pub struct Cli {
    /// Path to the database file
    #[arg(long, value_name = "FILE")]
    pub db: PathBuf,

    /// A flake attribute to use instead of files containing dependencies
    #[arg(long, value_name = "ATTR")]
    pub flake_attr: Option<String>,

    /// File containing all dependencies in pkgsBuildBuild delimited by newlines
    #[arg(long = "pkgsBuildBuild", value_name = "FILE")]
    pub pkgs_build_build: Option<PathBuf>,

    /// File containing all dependencies in pkgsBuildHost delimited by newlines
    #[arg(long = "pkgsBuildHost", value_name = "FILE")]
    pub pkgs_build_host: Option<PathBuf>,

    /// File containing all dependencies in pkgsBuildTarget delimited by newlines
    #[arg(long = "pkgsBuildTarget", value_name = "FILE")]
    pub pkgs_build_target: Option<PathBuf>,

    /// File containing all dependencies in pkgsHostHost delimited by newlines
    #[arg(long = "pkgsHostHost", value_name = "FILE")]
    pub pkgs_host_host: Option<PathBuf>,

    /// File containing all dependencies in pkgsHostTarget delimited by newlines
    #[arg(long = "pkgsHostTarget", value_name = "FILE")]
    pub pkgs_host_target: Option<PathBuf>,

    /// File containing all dependencies in pkgsTargetTarget delimited by newlines
    #[arg(long = "pkgsTargetTarget", value_name = "FILE")]
    pub pkgs_target_target: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE", env = "DEP_TRACKER_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The dependency files that were given, keyed by package set.
    pub fn package_set_files(&self) -> BTreeMap<PackageSet, PathBuf> {
        [
            (PackageSet::PkgsBuildBuild, &self.pkgs_build_build),
            (PackageSet::PkgsBuildHost, &self.pkgs_build_host),
            (PackageSet::PkgsBuildTarget, &self.pkgs_build_target),
            (PackageSet::PkgsHostHost, &self.pkgs_host_host),
            (PackageSet::PkgsHostTarget, &self.pkgs_host_target),
            (PackageSet::PkgsTargetTarget, &self.pkgs_target_target),
        ]
        .into_iter()
        .filter_map(|(set, file)| file.clone().map(|file| (set, file)))
        .collect()
    }
}
