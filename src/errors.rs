// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShipwrightError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A requested target name does not exist in the target vocabulary.
    /// Detected during resolution, before any target runs.
    #[error("Unknown target '{target}' requested for project '{project}'")]
    UnknownTarget { project: String, target: String },

    /// A known target that the project's kind does not implement.
    #[error("Target '{target}' is not supported by project '{project}'")]
    UnsupportedTarget { project: String, target: String },

    /// A delegated build tool exited nonzero; `code` is the tool's own
    /// exit status.
    #[error("'{command}' exited with status {code}")]
    ToolFailed { command: String, code: i32 },

    #[error("Transfer failed for {url}: {reason}")]
    TransferFailed { url: String, reason: String },

    /// No archive member satisfied the extraction predicate; the archive is
    /// assumed malformed or built for a different platform.
    #[error("No member matching '{wanted}' found in archive {archive:?}")]
    ArchiveMemberMissing { wanted: String, archive: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ShipwrightError>;
