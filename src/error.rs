//! Fatal error taxonomy for the bootstrap pipeline
//!
//! Every variant aborts the run; nothing here is caught and downgraded.
//! Non-fatal anomalies (unreadable scan files, absent optional scripts,
//! missing compose file for a file-based provider) are represented as
//! "not found" values, not errors.

use crate::detect::compose::DbProvider;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Target directory does not exist: {0}")]
    TargetNotFound(PathBuf),

    #[error("Missing package.json. Node.js repositories only in v1.")]
    MissingPackageJson,

    #[error("Invalid package.json: {0}")]
    InvalidPackageJson(String),

    #[error("package.json root must be a JSON object.")]
    DescriptorNotObject,

    #[error("Unsupported package manager: {0} (expected pnpm, npm, yarn, or bun)")]
    UnsupportedPackageManager(String),

    #[error("Compose file not found: {0}")]
    ComposeFileNotFound(PathBuf),

    #[error("Compose path is not a file: {0}")]
    ComposeNotAFile(PathBuf),

    #[error("Database provider '{0}' requires a compose file, but none was found")]
    ComposeRequired(DbProvider),

    #[error("No dev script detected; pass an explicit dev command")]
    DevCommandUnresolved,

    #[error("Template not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Failed to serialize runtime manifest: {0}")]
    ManifestSerialize(String),

    #[error("Failed to read {path}: {source}")]
    FileRead { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    FileWrite { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
