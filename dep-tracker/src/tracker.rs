// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! One complete run: collect inputs, build the database, dump it.

use std::path::Path;

use dep_tracker_db::{DepDb, OpenMode};
use serde::Serialize;
use tracing::info;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::extract::Extractor;
use crate::inputs::{deps_from_files, deps_from_flake_attr};
use crate::model::{json_record, log_artifacts, log_needs, log_provides, populate};
use crate::package_set::PackageSetDeps;

#[derive(Serialize)]
struct ResolvedArgs<'a> {
    db: &'a Path,
    flake_attr: Option<&'a str>,
    deps: &'a PackageSetDeps,
}

/// Collect the store entries named on the command line.
pub fn resolve_deps(cli: &Cli, config: &Config) -> Result<PackageSetDeps> {
    let deps = match &cli.flake_attr {
        Some(attr) => deps_from_flake_attr(&config.nix, attr)?,
        None => deps_from_files(&cli.package_set_files())?,
    };
    Ok(deps)
}

pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let deps = resolve_deps(cli, config)?;
    let resolved = ResolvedArgs {
        db: &cli.db,
        flake_attr: cli.flake_attr.as_deref(),
        deps: &deps,
    };
    if let Some(json) = json_record("resolved arguments", &resolved) {
        info!("{json}");
    }

    let mut db = DepDb::open(&cli.db, OpenMode::Create)?;
    info!("Creating tables");
    db.create_schema()?;
    info!("Tables created");

    let extractor = Extractor::new(config.elf_reader());
    populate(&mut db, &extractor, &deps)?;

    log_artifacts(&db)?;
    log_provides(&db)?;
    log_needs(&db)?;
    Ok(())
}
