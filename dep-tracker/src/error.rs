// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Db(#[from] dep_tracker_db::Error),

    #[error("{0}")]
    Extract(#[from] ExtractError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Store entry {path} does not exist")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store entry {path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("Failed to resolve store entry {path}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk store entry {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to stat candidate library {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ElfReaderError {
    #[error("Failed to run {program} on {library}: {source}")]
    Spawn {
        program: String,
        library: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed on {library} ({status}): {stderr}")]
    Failed {
        program: String,
        library: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} printed non-UTF-8 output for {library}")]
    InvalidOutput { program: String, library: PathBuf },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to scan for libraries: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to read needed libraries of {store_entry}: {source}")]
    Needs {
        store_entry: PathBuf,
        #[source]
        source: ElfReaderError,
    },
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Unknown package set: {0}")]
    UnknownPackageSet(String),

    #[error("Unknown dependency array name: {0}")]
    UnknownDependencyArray(String),

    #[error("Failed to read dependency file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to run {program}: {source}")]
    NixSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to evaluate {attr}: {stderr}")]
    NixEval { attr: String, stderr: String },

    #[error("Failed to parse evaluation output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Store entry {path} is listed under both {first} and {second}")]
    DuplicateArtifact {
        path: PathBuf,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
