// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Reading the `DT_NEEDED` entries of ELF files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::trace;

use crate::error::ElfReaderError;

/// Something that can list the dynamic dependencies an ELF file declares.
///
/// Implementations return the raw names in the order the file lists them,
/// duplicates included; callers decide how to collapse them.
pub trait ElfReader: Send + Sync {
    fn needed_libraries(&self, library: &Path) -> Result<Vec<String>, ElfReaderError>;
}

impl<R: ElfReader + ?Sized> ElfReader for &R {
    fn needed_libraries(&self, library: &Path) -> Result<Vec<String>, ElfReaderError> {
        (**self).needed_libraries(library)
    }
}

/// [`ElfReader`] backed by `patchelf --print-needed`.
///
/// One short-lived process per library; the call blocks until it exits.
#[derive(Debug, Clone)]
pub struct PatchelfReader {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Default for PatchelfReader {
    fn default() -> Self {
        Self::new("patchelf")
    }
}

impl PatchelfReader {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before `--print-needed <library>`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl ElfReader for PatchelfReader {
    fn needed_libraries(&self, library: &Path) -> Result<Vec<String>, ElfReaderError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg("--print-needed")
            .arg(library)
            .output()
            .map_err(|source| ElfReaderError::Spawn {
                program: self.program_name(),
                library: library.to_owned(),
                source,
            })?;

        if !output.status.success() {
            return Err(ElfReaderError::Failed {
                program: self.program_name(),
                library: library.to_owned(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout =
            String::from_utf8(output.stdout).map_err(|_| ElfReaderError::InvalidOutput {
                program: self.program_name(),
                library: library.to_owned(),
            })?;
        let needed: Vec<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        trace!("{} needs {:?}", library.display(), needed);
        Ok(needed)
    }
}
