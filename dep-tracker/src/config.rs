// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::elf::PatchelfReader;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Program used to read `DT_NEEDED` entries
    pub patchelf: PathBuf,

    /// Extra arguments passed before `--print-needed`
    pub patchelf_args: Vec<String>,

    /// Nix binary used to evaluate flake attributes
    pub nix: PathBuf,

    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            patchelf: PathBuf::from("patchelf"),
            patchelf_args: Vec::new(),
            nix: PathBuf::from("nix"),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.patchelf.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "patchelf must not be empty".to_string(),
            });
        }
        if self.nix.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "nix must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn elf_reader(&self) -> PatchelfReader {
        PatchelfReader::new(&self.patchelf).with_args(&self.patchelf_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.patchelf, PathBuf::from("patchelf"));
        assert_eq!(config.nix, PathBuf::from("nix"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.patchelf_args.is_empty());
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_toml(
            r#"
            patchelf = "/run/current-system/sw/bin/patchelf"
            patchelf_args = ["--debug"]
            log_level = "debug"
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.patchelf,
            PathBuf::from("/run/current-system/sw/bin/patchelf")
        );
        assert_eq!(config.patchelf_args, vec!["--debug"]);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml("workers = 4").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)), "{err}");
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Config::from_toml(r#"log_format = "pretty""#).is_err());
    }

    #[test]
    fn empty_program_is_invalid() {
        let err = Config::from_toml(r#"patchelf = """#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }), "{err}");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }), "{err}");
    }
}
