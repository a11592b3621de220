//! Port-key discovery
//!
//! Walks the project tree, pruning vendor/build and dot-prefixed
//! directories before descent, and extracts whole tokens ending in
//! `PORT` from env-style and text files. Well-known keys are seeded
//! ahead of discoveries so the consumer can always probe them; entries
//! are sorted per directory so the output is reproducible.

use ignore::WalkBuilder;
use regex::Regex;
use std::path::Path;
use tracing::{debug, warn};

/// Keys every worktree is expected to honor, in probe order.
const PRIORITY_KEYS: [&str; 5] = [
    "PORT",
    "APP_PORT",
    "SERVER_PORT",
    "VITE_PORT",
    "NEXT_PUBLIC_PORT",
];

const EXCLUDED_DIRS: [&str; 8] = [
    "node_modules",
    "dist",
    "build",
    "out",
    "coverage",
    "vendor",
    "tmp",
    "__pycache__",
];

const TEXT_SUFFIXES: [&str; 13] = [
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "json", "yml", "yaml", "toml", "sh", "env", "txt",
];

/// Scan latency bound; oversized files are skipped, not errors.
const MAX_SCAN_FILE_SIZE: u64 = 256 * 1024;

pub fn scan_port_keys(project_dir: &Path) -> Vec<String> {
    let token_re = Regex::new(r"\b(?:[A-Z][A-Z0-9_]*)?PORT\b").expect("valid regex");

    let mut keys: Vec<String> = PRIORITY_KEYS.iter().map(|k| k.to_string()).collect();

    let walk = WalkBuilder::new(project_dir)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !(name.starts_with('.') || EXCLUDED_DIRS.contains(&name.as_ref()))
        })
        .build();

    let mut files_scanned = 0usize;
    for result in walk {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "Failed to read directory entry");
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if !is_scannable(path) {
            continue;
        }
        match entry.metadata() {
            Ok(meta) if meta.len() <= MAX_SCAN_FILE_SIZE => {}
            _ => continue,
        }

        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(_) => continue,
        };
        let content = String::from_utf8_lossy(&bytes);
        files_scanned += 1;

        for token in token_re.find_iter(&content) {
            let token = token.as_str();
            if !keys.iter().any(|k| k == token) {
                keys.push(token.to_string());
            }
        }
    }

    debug!(files_scanned, keys = keys.len(), "Port-key scan complete");
    keys
}

/// Files eligible for scanning: any `.env*` file, or one of the fixed
/// text suffixes.
fn is_scannable(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };
    if name.starts_with(".env") {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| TEXT_SUFFIXES.contains(&ext))
        .unwrap_or(false)
}
