// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Collecting the store entries of each package set.
//!
//! Entries come either from one newline-delimited file per package set or
//! from evaluating the dependency arrays of a flake attribute.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::error::InputError;
use crate::package_set::{DependencyArray, PackageSet, PackageSetDeps};

/// Read one newline-delimited list of store entries per package set.
///
/// Missing or empty inputs only produce a warning; that package set then has
/// no entries.
pub fn deps_from_files(files: &BTreeMap<PackageSet, PathBuf>) -> Result<PackageSetDeps, InputError> {
    let mut deps = PackageSetDeps::new();
    for package_set in PackageSet::ALL {
        let Some(file) = files.get(&package_set) else {
            warn!("No file provided for {package_set}");
            continue;
        };

        if !file.is_file() {
            warn!("File for {package_set} does not exist: {}", file.display());
            continue;
        }

        let contents = fs::read_to_string(file).map_err(|source| InputError::ReadFile {
            path: file.clone(),
            source,
        })?;
        let entries = parse_entry_list(&contents);
        if entries.is_empty() {
            warn!("No dependencies found for {package_set}");
            continue;
        }

        deps.insert(package_set, entries);
    }
    Ok(deps)
}

fn parse_entry_list(contents: &str) -> BTreeSet<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Nix function keeping only the dependency arrays of a derivation.
fn apply_expression() -> String {
    let mut names: Vec<&str> = DependencyArray::ALL.iter().map(|a| a.as_str()).collect();
    names.sort_unstable();
    let names = names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "pkg: builtins.intersectAttrs \
         (builtins.listToAttrs (builtins.map (name: {{ inherit name; value = null; }}) [ {names} ])) \
         pkg"
    )
}

/// Evaluate the dependency arrays of `attr` with `nix eval`.
pub fn deps_from_flake_attr(nix: &Path, attr: &str) -> Result<PackageSetDeps, InputError> {
    info!("Using flake attribute: {attr}");
    let output = Command::new(nix)
        .args(["--extra-experimental-features", "nix-command flakes"])
        .args(["eval", "--json", attr, "--apply"])
        .arg(apply_expression())
        .output()
        .map_err(|source| InputError::NixSpawn {
            program: nix.display().to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(InputError::NixEval {
            attr: attr.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    parse_flake_attr_deps(&String::from_utf8_lossy(&output.stdout))
}

/// Translate `{ "<array name>": [ "<store path>", ... ] }` into package sets.
///
/// Arrays feeding the same package set are merged. An array name outside the
/// known set is an error.
pub fn parse_flake_attr_deps(json: &str) -> Result<PackageSetDeps, InputError> {
    let arrays: BTreeMap<String, Vec<PathBuf>> = serde_json::from_str(json)?;
    let mut deps = PackageSetDeps::new();
    for (name, entries) in arrays {
        let array: DependencyArray = name.parse()?;
        deps.entry(array.package_set()).or_default().extend(entries);
    }
    Ok(deps)
}
