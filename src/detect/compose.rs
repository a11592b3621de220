//! Compose discovery and database inference
//!
//! The compose file is only scanned for hints, never executed or fully
//! parsed. Provider inference is an ordered chain of guard clauses:
//! explicit override, compose keywords, sqlite driver dependencies,
//! then `none`. Service-name inference is a tolerant line-oriented scan
//! of the compose text; malformed files yield a possibly wrong but
//! always-present name.

use crate::error::{BootstrapError, Result};
use crate::project::ProjectDescriptor;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Conventional compose filenames, in discovery order.
const COMPOSE_CANDIDATES: [&str; 5] = [
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
    "docker-compose.worktree.yml",
];

const SQLITE_DRIVERS: [&str; 3] = ["better-sqlite3", "sqlite3", "@libsql/client"];

const DEFAULT_SERVICE_NAME: &str = "db";

/// A resolved database provider. The CLI-only `auto` sentinel never
/// reaches this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DbProvider {
    Postgres,
    Mysql,
    Sqlite,
    None,
}

impl DbProvider {
    /// Providers that need a container service to run locally.
    pub fn is_dockerized(&self) -> bool {
        matches!(self, Self::Postgres | Self::Mysql)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Sqlite => "sqlite",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DbProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compose file path plus its raw text, when one was found.
#[derive(Debug, Clone)]
pub struct ComposeReference {
    pub path: PathBuf,
    pub content: String,
}

/// Locates the compose file: an explicit path must exist and be a
/// regular file (fatal otherwise); without one the conventional names
/// are probed in order, and absence is not an error.
pub fn detect_compose_file(
    project_dir: &Path,
    explicit: Option<&str>,
) -> Result<Option<ComposeReference>> {
    if let Some(raw) = explicit {
        let candidate = Path::new(raw);
        let path = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            project_dir.join(candidate)
        };
        if !path.exists() {
            return Err(BootstrapError::ComposeFileNotFound(path));
        }
        if !path.is_file() {
            return Err(BootstrapError::ComposeNotAFile(path));
        }
        return Ok(Some(read_compose(path)?));
    }

    for name in COMPOSE_CANDIDATES {
        let path = project_dir.join(name);
        if path.is_file() {
            debug!(compose = name, "Compose file found");
            return Ok(Some(read_compose(path)?));
        }
    }

    Ok(None)
}

fn read_compose(path: PathBuf) -> Result<ComposeReference> {
    let bytes = fs::read(&path).map_err(|source| BootstrapError::FileRead {
        path: path.clone(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok(ComposeReference { path, content })
}

/// Infers the provider: explicit override short-circuits, compose text
/// keywords come next, then sqlite driver packages, then `none`.
pub fn infer_db_provider(
    explicit: Option<DbProvider>,
    pkg: &ProjectDescriptor,
    compose_content: &str,
) -> DbProvider {
    if let Some(provider) = explicit {
        return provider;
    }

    let lower = compose_content.to_lowercase();
    if lower.contains("postgres") {
        return DbProvider::Postgres;
    }
    if lower.contains("mysql") || lower.contains("mariadb") {
        return DbProvider::Mysql;
    }

    let deps = pkg.dependency_names();
    if SQLITE_DRIVERS.iter().any(|driver| deps.iter().any(|d| d == driver)) {
        return DbProvider::Sqlite;
    }

    DbProvider::None
}

/// Infers the compose service name for a dockerized provider. An
/// explicit override wins; a two-space-indented `db:` line is taken
/// directly; otherwise the first two-space-indented key inside the
/// `services:` scope is used, falling back to `db`.
pub fn infer_service_name(explicit: Option<&str>, compose_content: &str) -> String {
    if let Some(name) = explicit {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if compose_content
        .lines()
        .any(|line| line.trim_end() == "  db:")
    {
        return DEFAULT_SERVICE_NAME.to_string();
    }

    let mut in_services = false;
    for line in compose_content.lines() {
        let trimmed_end = line.trim_end();
        if trimmed_end == "services:" {
            in_services = true;
            continue;
        }
        if !in_services {
            continue;
        }
        // A non-indented, non-empty line ends the services scope.
        if !trimmed_end.is_empty() && !line.starts_with(' ') {
            break;
        }
        if let Some(name) = service_key(line) {
            return name;
        }
    }

    DEFAULT_SERVICE_NAME.to_string()
}

/// A service key is exactly two-space indented, ends with `:`, and is
/// neither a comment nor a list item.
fn service_key(line: &str) -> Option<String> {
    let rest = line.strip_prefix("  ")?;
    if rest.starts_with(' ') || rest.starts_with('#') || rest.starts_with('-') {
        return None;
    }
    let trimmed = rest.trim_end();
    let key = trimmed.strip_suffix(':')?;
    if key.is_empty() || key.contains(' ') {
        return None;
    }
    Some(key.to_string())
}
