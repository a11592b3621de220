//! Project descriptor - the parsed package.json of the target checkout
//!
//! Read-only source of truth for script and dependency lookups. The
//! descriptor must be a JSON object at the root; anything else is fatal.

use crate::error::{BootstrapError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const DEPENDENCY_KEYS: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Script name -> shell command body, from the descriptor's `scripts` object.
pub type ScriptTable = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct ProjectDescriptor {
    root: Map<String, Value>,
    dir_name: String,
}

impl ProjectDescriptor {
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join("package.json");
        if !path.exists() {
            return Err(BootstrapError::MissingPackageJson);
        }

        let text = fs::read_to_string(&path)
            .map_err(|source| BootstrapError::FileRead { path, source })?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|err| BootstrapError::InvalidPackageJson(err.to_string()))?;

        let root = match value {
            Value::Object(map) => map,
            _ => return Err(BootstrapError::DescriptorNotObject),
        };

        let dir_name = project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(keys = root.len(), "Loaded package.json");
        Ok(Self { root, dir_name })
    }

    #[cfg(test)]
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                root: map,
                dir_name: String::new(),
            }),
            _ => Err(BootstrapError::DescriptorNotObject),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.root.get("name").and_then(Value::as_str)
    }

    /// The `packageManager` field, e.g. `pnpm@9.1.0`.
    pub fn package_manager_field(&self) -> Option<&str> {
        self.root.get("packageManager").and_then(Value::as_str)
    }

    /// The `scripts` object; empty unless present and object-typed.
    pub fn scripts(&self) -> ScriptTable {
        let mut table = ScriptTable::new();
        if let Some(Value::Object(scripts)) = self.root.get("scripts") {
            for (name, body) in scripts {
                if let Some(body) = body.as_str() {
                    table.insert(name.clone(), body.to_string());
                }
            }
        }
        table
    }

    /// Union of package names across all four dependency maps.
    pub fn dependency_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for key in DEPENDENCY_KEYS {
            if let Some(Value::Object(deps)) = self.root.get(key) {
                for name in deps.keys() {
                    if !names.iter().any(|n| n == name) {
                        names.push(name.clone());
                    }
                }
            }
        }
        names
    }

    /// Slug identifying the repo in the manifest: descriptor name with
    /// any `@scope/` prefix stripped, falling back to the directory
    /// basename; lowercased, non-alphanumeric runs collapsed to `-`.
    pub fn repo_slug(&self) -> String {
        let raw = self
            .name()
            .map(|n| n.rsplit('/').next().unwrap_or(n))
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.dir_name.clone());
        slugify(&raw)
    }
}

fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut last_dash = true;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
