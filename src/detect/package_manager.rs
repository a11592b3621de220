//! Package manager resolution
//!
//! Precedence, first match wins: explicit override, lockfile on disk
//! (pnpm -> bun -> yarn -> npm), the descriptor's `packageManager`
//! field, then npm as the default. Pure function of the filesystem and
//! the descriptor; never shells out.

use crate::error::{BootstrapError, Result};
use crate::project::ProjectDescriptor;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    Pnpm,
    Npm,
    Yarn,
    Bun,
}

/// Lockfile signals in fallback order.
const LOCKFILES: [(&str, PackageManagerKind); 5] = [
    ("pnpm-lock.yaml", PackageManagerKind::Pnpm),
    ("bun.lockb", PackageManagerKind::Bun),
    ("bun.lock", PackageManagerKind::Bun),
    ("yarn.lock", PackageManagerKind::Yarn),
    ("package-lock.json", PackageManagerKind::Npm),
];

impl PackageManagerKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pnpm" => Some(Self::Pnpm),
            "npm" => Some(Self::Npm),
            "yarn" => Some(Self::Yarn),
            "bun" => Some(Self::Bun),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pnpm => "pnpm",
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    pub fn install_command(&self) -> String {
        format!("{} install", self.as_str())
    }

    /// The manager's idiomatic `run` invocation for a named script.
    pub fn run_script(&self, script: &str) -> String {
        match self {
            Self::Yarn => format!("yarn {script}"),
            other => format!("{} run {script}", other.as_str()),
        }
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn resolve(
    explicit: Option<&str>,
    project_dir: &Path,
    pkg: &ProjectDescriptor,
) -> Result<PackageManagerKind> {
    if let Some(value) = explicit {
        let trimmed = value.trim();
        return PackageManagerKind::parse(trimmed)
            .ok_or_else(|| BootstrapError::UnsupportedPackageManager(trimmed.to_string()));
    }

    for (lockfile, kind) in LOCKFILES {
        if project_dir.join(lockfile).is_file() {
            debug!(lockfile, manager = %kind, "Package manager from lockfile");
            return Ok(kind);
        }
    }

    if let Some(field) = pkg.package_manager_field() {
        let name = field.split('@').next().unwrap_or(field).trim();
        if let Some(kind) = PackageManagerKind::parse(name) {
            debug!(field, manager = %kind, "Package manager from packageManager field");
            return Ok(kind);
        }
    }

    Ok(PackageManagerKind::Npm)
}
