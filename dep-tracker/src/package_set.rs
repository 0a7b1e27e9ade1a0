// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Package sets and the stdenv dependency arrays that feed them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::error::InputError;

/// Store entries grouped by the package set they were listed under.
///
/// Iteration follows the declaration order of [`PackageSet`].
pub type PackageSetDeps = BTreeMap<PackageSet, BTreeSet<PathBuf>>;

/// The six splice classes of a dependency, named after the `pkgs*` sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PackageSet {
    PkgsBuildBuild,
    PkgsBuildHost,
    PkgsBuildTarget,
    PkgsHostHost,
    PkgsHostTarget,
    PkgsTargetTarget,
}

impl PackageSet {
    pub const ALL: [PackageSet; 6] = [
        PackageSet::PkgsBuildBuild,
        PackageSet::PkgsBuildHost,
        PackageSet::PkgsBuildTarget,
        PackageSet::PkgsHostHost,
        PackageSet::PkgsHostTarget,
        PackageSet::PkgsTargetTarget,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PackageSet::PkgsBuildBuild => "pkgsBuildBuild",
            PackageSet::PkgsBuildHost => "pkgsBuildHost",
            PackageSet::PkgsBuildTarget => "pkgsBuildTarget",
            PackageSet::PkgsHostHost => "pkgsHostHost",
            PackageSet::PkgsHostTarget => "pkgsHostTarget",
            PackageSet::PkgsTargetTarget => "pkgsTargetTarget",
        }
    }
}

impl fmt::Display for PackageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageSet {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageSet::ALL
            .into_iter()
            .find(|set| set.as_str() == s)
            .ok_or_else(|| InputError::UnknownPackageSet(s.to_string()))
    }
}

/// Dependency attribute names a derivation may carry.
///
/// The `deps*` names are the explicit stdenv arrays; the remaining four are
/// the legacy spellings that still dominate nixpkgs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DependencyArray {
    DepsBuildBuild,
    DepsBuildBuildPropagated,
    DepsBuildHost,
    DepsBuildHostPropagated,
    DepsBuildTarget,
    DepsBuildTargetPropagated,
    DepsHostHost,
    DepsHostHostPropagated,
    DepsHostTarget,
    DepsHostTargetPropagated,
    DepsTargetTarget,
    DepsTargetTargetPropagated,
    NativeBuildInputs,
    PropagatedNativeBuildInputs,
    BuildInputs,
    PropagatedBuildInputs,
}

impl DependencyArray {
    pub const ALL: [DependencyArray; 16] = [
        DependencyArray::DepsBuildBuild,
        DependencyArray::DepsBuildBuildPropagated,
        DependencyArray::DepsBuildHost,
        DependencyArray::DepsBuildHostPropagated,
        DependencyArray::DepsBuildTarget,
        DependencyArray::DepsBuildTargetPropagated,
        DependencyArray::DepsHostHost,
        DependencyArray::DepsHostHostPropagated,
        DependencyArray::DepsHostTarget,
        DependencyArray::DepsHostTargetPropagated,
        DependencyArray::DepsTargetTarget,
        DependencyArray::DepsTargetTargetPropagated,
        DependencyArray::NativeBuildInputs,
        DependencyArray::PropagatedNativeBuildInputs,
        DependencyArray::BuildInputs,
        DependencyArray::PropagatedBuildInputs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DependencyArray::DepsBuildBuild => "depsBuildBuild",
            DependencyArray::DepsBuildBuildPropagated => "depsBuildBuildPropagated",
            DependencyArray::DepsBuildHost => "depsBuildHost",
            DependencyArray::DepsBuildHostPropagated => "depsBuildHostPropagated",
            DependencyArray::DepsBuildTarget => "depsBuildTarget",
            DependencyArray::DepsBuildTargetPropagated => "depsBuildTargetPropagated",
            DependencyArray::DepsHostHost => "depsHostHost",
            DependencyArray::DepsHostHostPropagated => "depsHostHostPropagated",
            DependencyArray::DepsHostTarget => "depsHostTarget",
            DependencyArray::DepsHostTargetPropagated => "depsHostTargetPropagated",
            DependencyArray::DepsTargetTarget => "depsTargetTarget",
            DependencyArray::DepsTargetTargetPropagated => "depsTargetTargetPropagated",
            DependencyArray::NativeBuildInputs => "nativeBuildInputs",
            DependencyArray::PropagatedNativeBuildInputs => "propagatedNativeBuildInputs",
            DependencyArray::BuildInputs => "buildInputs",
            DependencyArray::PropagatedBuildInputs => "propagatedBuildInputs",
        }
    }

    /// The package set whose entries this array contributes.
    ///
    /// Propagation does not change the splice class: `depsXYPropagated`
    /// lands in `pkgsXY` just like `depsXY`.
    pub fn package_set(self) -> PackageSet {
        use DependencyArray::*;
        match self {
            DepsBuildBuild | DepsBuildBuildPropagated => PackageSet::PkgsBuildBuild,
            DepsBuildHost | DepsBuildHostPropagated => PackageSet::PkgsBuildHost,
            DepsBuildTarget | DepsBuildTargetPropagated => PackageSet::PkgsBuildTarget,
            DepsHostHost | DepsHostHostPropagated => PackageSet::PkgsHostHost,
            DepsHostTarget | DepsHostTargetPropagated => PackageSet::PkgsHostTarget,
            DepsTargetTarget | DepsTargetTargetPropagated => PackageSet::PkgsTargetTarget,
            NativeBuildInputs | PropagatedNativeBuildInputs => PackageSet::PkgsBuildHost,
            BuildInputs | PropagatedBuildInputs => PackageSet::PkgsHostTarget,
        }
    }
}

impl fmt::Display for DependencyArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyArray {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DependencyArray::ALL
            .into_iter()
            .find(|array| array.as_str() == s)
            .ok_or_else(|| InputError::UnknownDependencyArray(s.to_string()))
    }
}
