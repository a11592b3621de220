//! Runtime manifest - the machine-readable record of a patch run
//!
//! Serialized pretty to `.bakery-runtime.json` in the project root.
//! Written fresh every run; unlike the scripts there are no merge
//! semantics here.

use crate::detect::compose::DbProvider;
use crate::detect::package_manager::PackageManagerKind;
use crate::error::{BootstrapError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const MANIFEST_FILE_NAME: &str = ".bakery-runtime.json";
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeManifest {
    pub version: u32,
    pub package_manager: PackageManagerKind,
    pub commands: CommandTable,
    pub database: DatabaseInfo,
    pub bakery: BakeryInfo,
    pub env: EnvInfo,
    pub meta: MetaInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandTable {
    pub install: String,
    pub dev: String,
    pub dev_with_port: Option<String>,
    pub migrate: Option<String>,
    pub seed: Option<String>,
    pub db_tool: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    pub provider: DbProvider,
    pub dockerized: bool,
    pub compose_file: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BakeryInfo {
    pub resource_plan: Vec<String>,
    pub default_num_resources: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvInfo {
    pub port_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaInfo {
    pub repo_slug: String,
}

impl RuntimeManifest {
    /// Overwrites any prior manifest at the project root.
    pub fn write(&self, project_dir: &Path) -> Result<PathBuf> {
        let path = project_dir.join(MANIFEST_FILE_NAME);
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| BootstrapError::ManifestSerialize(err.to_string()))?;
        fs::write(&path, json + "\n").map_err(|source| BootstrapError::FileWrite {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Runtime manifest written");
        Ok(path)
    }
}

/// The compose path recorded in the manifest: relative to the project
/// root when it lies inside it, absolute otherwise.
pub fn manifest_compose_path(project_dir: &Path, compose: &Path) -> String {
    compose
        .strip_prefix(project_dir)
        .unwrap_or(compose)
        .to_string_lossy()
        .into_owned()
}
