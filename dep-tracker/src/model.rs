// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Assembling the artifacts, provides and needs relations.
//!
//! [`populate`] loads the relations in three stages, each its own atomic bulk
//! insert: artifacts, then every provides row, then every needs row. A
//! failure in a later stage leaves the earlier stages committed.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use dep_tracker_db::{Artifact, DepDb, Needs, Provides};
use serde::Serialize;
use tracing::{info, warn};

use crate::elf::ElfReader;
use crate::error::{ModelError, Result};
use crate::extract::Extractor;
use crate::package_set::PackageSetDeps;

/// The three relations of one run, in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyModel {
    pub artifacts: Vec<Artifact>,
    pub provides: Vec<Provides>,
    pub needs: Vec<Needs>,
}

/// One row per (store entry, package set) pair, package sets in order.
pub fn artifact_rows(deps: &PackageSetDeps) -> Vec<Artifact> {
    deps.iter()
        .flat_map(|(package_set, entries)| {
            entries.iter().map(move |entry| Artifact {
                path: entry.to_string_lossy().into_owned(),
                classification: package_set.to_string(),
            })
        })
        .collect()
}

/// Every store entry mentioned anywhere in `deps`, each once.
pub fn working_set(deps: &PackageSetDeps) -> BTreeSet<&Path> {
    deps.values()
        .flat_map(|entries| entries.iter().map(|entry| entry.as_path()))
        .collect()
}

fn check_exclusive(artifacts: &[Artifact]) -> std::result::Result<(), ModelError> {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for artifact in artifacts {
        if let Some(first) = seen.insert(&artifact.path, &artifact.classification) {
            return Err(ModelError::DuplicateArtifact {
                path: artifact.path.clone().into(),
                first: first.to_string(),
                second: artifact.classification.clone(),
            });
        }
    }
    Ok(())
}

fn collect_provides<R: ElfReader>(
    extractor: &Extractor<R>,
    entries: &BTreeSet<&Path>,
) -> Result<Vec<Provides>> {
    let mut provides = Vec::new();
    for entry in entries {
        provides.extend(extractor.get_provides(entry)?);
    }
    Ok(provides)
}

fn collect_needs<R: ElfReader>(
    extractor: &Extractor<R>,
    entries: &BTreeSet<&Path>,
) -> Result<Vec<Needs>> {
    let mut needs = Vec::new();
    for entry in entries {
        needs.extend(extractor.get_needs(entry)?);
    }
    Ok(needs)
}

/// Build all three relations in memory.
///
/// A store entry listed under two package sets is rejected, just as the
/// database would reject the second artifact row.
pub fn build_model<R: ElfReader>(
    extractor: &Extractor<R>,
    deps: &PackageSetDeps,
) -> Result<DependencyModel> {
    let artifacts = artifact_rows(deps);
    check_exclusive(&artifacts)?;

    let entries = working_set(deps);
    let provides = collect_provides(extractor, &entries)?;
    let needs = collect_needs(extractor, &entries)?;

    Ok(DependencyModel {
        artifacts,
        provides,
        needs,
    })
}

/// Compute the relations and bulk-load them into `db` stage by stage.
pub fn populate<R: ElfReader>(
    db: &mut DepDb,
    extractor: &Extractor<R>,
    deps: &PackageSetDeps,
) -> Result<()> {
    let artifacts = artifact_rows(deps);
    let count = db.insert_artifacts(&artifacts)?;
    info!("Inserted {count} artifacts");

    let entries = working_set(deps);
    let provides = collect_provides(extractor, &entries)?;
    let count = db.insert_provides(&provides)?;
    info!("Inserted {count} provides rows");

    let needs = collect_needs(extractor, &entries)?;
    let count = db.insert_needs(&needs)?;
    info!("Inserted {count} needs rows");
    Ok(())
}

/// Render `value` as one compact JSON line, warning when it cannot be.
pub(crate) fn json_record<T: Serialize>(what: &str, value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!("Failed to serialize {what}: {e}");
            None
        }
    }
}

fn log_rows<T: Serialize>(table: &str, rows: &[T]) {
    info!("Logging contents of {table}");
    for row in rows {
        if let Some(json) = json_record(table, row) {
            info!("{json}");
        }
    }
}

/// Log every artifact row, ordered by path.
pub fn log_artifacts(db: &DepDb) -> Result<()> {
    log_rows("artifacts", &db.query_artifacts()?);
    Ok(())
}

/// Log every provides row, ordered by key.
pub fn log_provides(db: &DepDb) -> Result<()> {
    log_rows("provides", &db.query_provides()?);
    Ok(())
}

/// Log every needs row, ordered by key.
pub fn log_needs(db: &DepDb) -> Result<()> {
    log_rows("needs", &db.query_needs()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use dep_tracker_db::Table;
    use tempfile::TempDir;

    use super::*;
    use crate::error::{Error, ExtractError};
    use crate::extract::tests::{FakeReader, touch};
    use crate::package_set::PackageSet;

    fn deps<P: AsRef<Path>>(entries: &[(PackageSet, P)]) -> PackageSetDeps {
        let mut deps = PackageSetDeps::new();
        for (set, path) in entries {
            deps.entry(*set).or_default().insert(path.as_ref().to_path_buf());
        }
        deps
    }

    fn entry(dir: &TempDir, name: &str, libraries: &[&str]) -> PathBuf {
        let root = dir.path().join(name);
        std::fs::create_dir_all(&root).unwrap();
        for library in libraries {
            touch(&root, library);
        }
        root
    }

    #[test]
    fn empty_input_gives_empty_relations() {
        let extractor = Extractor::new(FakeReader::default());
        let model = build_model(&extractor, &PackageSetDeps::new()).unwrap();
        assert_eq!(model, DependencyModel::default());

        let mut db = DepDb::open_memory().unwrap();
        populate(&mut db, &extractor, &PackageSetDeps::new()).unwrap();
        for table in [Table::Artifacts, Table::Provides, Table::Needs] {
            assert_eq!(db.count_rows(table).unwrap(), 0);
        }
    }

    #[test]
    fn package_sets_do_not_leak() {
        let dir = TempDir::new().unwrap();
        let a = entry(&dir, "a", &[]);
        let b = entry(&dir, "b", &[]);
        let deps = deps(&[
            (PackageSet::PkgsHostTarget, &b),
            (PackageSet::PkgsBuildHost, &a),
        ]);

        let rows = artifact_rows(&deps);
        assert_eq!(
            rows,
            vec![
                Artifact {
                    path: a.to_string_lossy().into_owned(),
                    classification: "pkgsBuildHost".into(),
                },
                Artifact {
                    path: b.to_string_lossy().into_owned(),
                    classification: "pkgsHostTarget".into(),
                },
            ]
        );
    }

    #[test]
    fn entry_in_two_package_sets_is_rejected() {
        let dir = TempDir::new().unwrap();
        let a = entry(&dir, "a", &["lib/liba.so"]);
        let deps = deps(&[
            (PackageSet::PkgsBuildHost, &a),
            (PackageSet::PkgsHostTarget, &a),
        ]);
        let extractor = Extractor::new(FakeReader::default());

        let err = build_model(&extractor, &deps).unwrap_err();
        match err {
            Error::Model(ModelError::DuplicateArtifact { first, second, .. }) => {
                assert_eq!(first, "pkgsBuildHost");
                assert_eq!(second, "pkgsHostTarget");
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut db = DepDb::open_memory().unwrap();
        let err = populate(&mut db, &extractor, &deps).unwrap_err();
        assert!(
            matches!(&err, Error::Db(e) if e.is_constraint_violation()),
            "{err}"
        );
        assert_eq!(db.count_rows(Table::Artifacts).unwrap(), 0);
    }

    #[test]
    fn unserializable_records_are_reported_not_logged() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let bad = PathBuf::from(OsStr::from_bytes(b"/nix/store/aaaa-f\xff"));
        assert_eq!(json_record("path", &bad), None);

        let good = Artifact {
            path: "/nix/store/aaaa-foo".to_string(),
            classification: "pkgsHostTarget".to_string(),
        };
        assert_eq!(
            json_record("artifacts", &good).as_deref(),
            Some(r#"{"path":"/nix/store/aaaa-foo","classification":"pkgsHostTarget"}"#)
        );
    }

    #[test]
    fn entry_listed_twice_is_scanned_and_read_once() {
        let dir = TempDir::new().unwrap();
        let a = entry(&dir, "a", &["lib/liba.so"]);
        let deps = deps(&[
            (PackageSet::PkgsBuildHost, &a),
            (PackageSet::PkgsHostTarget, &a),
        ]);

        let entries = working_set(&deps);
        assert_eq!(entries, BTreeSet::from([a.as_path()]));

        let reader = FakeReader::default().with("liba.so", &["libc.so.6"]);
        let extractor = Extractor::new(&reader);
        let provides = collect_provides(&extractor, &entries).unwrap();
        let needs = collect_needs(&extractor, &entries).unwrap();

        assert_eq!(extractor.scanner().scanned_entries(), 1);
        assert_eq!(reader.calls.lock().unwrap().len(), 1);
        assert_eq!(provides.len(), 1);
        assert_eq!(needs.len(), 1);
    }

    #[test]
    fn each_entry_is_scanned_once_across_both_passes() {
        let dir = TempDir::new().unwrap();
        let a = entry(&dir, "a", &["lib/liba.so"]);
        let b = entry(&dir, "b", &["lib/libb.so"]);
        let deps = deps(&[
            (PackageSet::PkgsBuildHost, &a),
            (PackageSet::PkgsHostTarget, &b),
        ]);
        let extractor = Extractor::new(FakeReader::default().with("libb.so", &["liba.so"]));

        let model = build_model(&extractor, &deps).unwrap();
        assert_eq!(extractor.scanner().scanned_entries(), 2);
        assert_eq!(model.provides.len(), 2);
        assert_eq!(model.needs.len(), 1);
        assert_eq!(model.needs[0].library_name, "liba.so");
    }

    #[test]
    fn facts_reference_known_artifacts() {
        let dir = TempDir::new().unwrap();
        let a = entry(&dir, "a", &["lib/liba.so", "lib/liba.so.1"]);
        let b = entry(&dir, "b", &["lib/libb.so"]);
        let deps = deps(&[
            (PackageSet::PkgsHostHost, &a),
            (PackageSet::PkgsTargetTarget, &b),
        ]);
        let reader = FakeReader::default()
            .with("liba.so", &["libc.so.6"])
            .with("libb.so", &["liba.so.1", "libc.so.6"]);
        let extractor = Extractor::new(reader);

        let model = build_model(&extractor, &deps).unwrap();
        let known: BTreeSet<&str> = model.artifacts.iter().map(|a| a.path.as_str()).collect();
        assert!(model.provides.iter().all(|p| known.contains(p.artifact.as_str())));
        assert!(model.needs.iter().all(|n| known.contains(n.artifact.as_str())));

        let mut db = DepDb::open_memory().unwrap();
        populate(&mut db, &extractor, &deps).unwrap();

        let mut provides = model.provides.clone();
        provides.sort();
        assert_eq!(db.query_provides().unwrap(), provides);
        let mut needs = model.needs.clone();
        needs.sort();
        assert_eq!(db.query_needs().unwrap(), needs);
        assert_eq!(needs.len(), 3);
    }

    #[test]
    fn needs_failure_keeps_earlier_stages() {
        let dir = TempDir::new().unwrap();
        let a = entry(&dir, "a", &["lib/liba.so"]);
        let b = entry(&dir, "b", &["lib/libb1.so", "lib/libb2.so", "lib/libb3.so"]);
        let deps = deps(&[
            (PackageSet::PkgsBuildHost, &a),
            (PackageSet::PkgsHostTarget, &b),
        ]);
        let reader = FakeReader::default()
            .with("liba.so", &["libc.so.6"])
            .with("libb1.so", &["libc.so.6"])
            .failing("libb2.so");
        let extractor = Extractor::new(reader);

        let mut db = DepDb::open_memory().unwrap();
        let err = populate(&mut db, &extractor, &deps).unwrap_err();
        assert!(
            matches!(err, Error::Extract(ExtractError::Needs { ref store_entry, .. }) if *store_entry == b),
            "{err}"
        );
        assert_eq!(db.count_rows(Table::Artifacts).unwrap(), 2);
        assert_eq!(db.count_rows(Table::Provides).unwrap(), 4);
        assert_eq!(db.count_rows(Table::Needs).unwrap(), 0);
    }

    #[test]
    fn missing_entry_aborts() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("not-built");
        let deps = deps(&[(PackageSet::PkgsHostTarget, &missing)]);
        let extractor = Extractor::new(FakeReader::default());

        let err = build_model(&extractor, &deps).unwrap_err();
        assert!(matches!(err, Error::Extract(ExtractError::Scan(_))), "{err}");
    }
}
