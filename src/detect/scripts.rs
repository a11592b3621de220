//! Script candidate resolution and command synthesis
//!
//! Candidate lookup is first-match over a fixed ordered list, never
//! best-match. An explicit flag value always beats detection, and the
//! literal `none` (case-insensitive) disables a feature instead of
//! supplying a command.

use crate::detect::package_manager::PackageManagerKind;
use crate::project::ScriptTable;
use regex::Regex;

pub const DEV_CANDIDATES: [&str; 4] = ["dev", "start:dev", "serve", "start"];
pub const MIGRATE_CANDIDATES: [&str; 4] = ["db:migrate", "migrate", "migrate:dev", "prisma:migrate"];
pub const SEED_CANDIDATES: [&str; 3] = ["db:seed", "seed", "prisma:seed"];
pub const DB_TOOL_CANDIDATES: [&str; 4] = ["db:studio", "studio", "prisma:studio", "drizzle:studio"];

/// Dev-server signatures that accept a `--port` argument.
const PORT_AWARE_TOOLS: [&str; 4] = ["next dev", "vite", "nuxt", "webpack serve"];

/// How a command flag was supplied on the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSetting {
    /// Flag absent: detect from the script table.
    Auto,
    /// Literal `none` (or blank): feature disabled.
    Disabled,
    /// Explicit command, used verbatim.
    Explicit(String),
}

impl CommandSetting {
    pub fn from_flag(value: Option<&str>) -> Self {
        match value {
            None => Self::Auto,
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
                    Self::Disabled
                } else {
                    Self::Explicit(trimmed.to_string())
                }
            }
        }
    }
}

/// First candidate present as a key in the script table.
pub fn detect_script_name<'a>(scripts: &ScriptTable, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|candidate| scripts.contains_key(*candidate))
}

/// Resolves a command: explicit wins, `none` disables, otherwise the
/// first detected candidate is turned into the manager's invocation.
pub fn resolve_command(
    setting: &CommandSetting,
    kind: PackageManagerKind,
    scripts: &ScriptTable,
    candidates: &[&str],
) -> Option<String> {
    match setting {
        CommandSetting::Explicit(cmd) => Some(cmd.clone()),
        CommandSetting::Disabled => None,
        CommandSetting::Auto => {
            detect_script_name(scripts, candidates).map(|name| kind.run_script(name))
        }
    }
}

/// Synthesizes a port-forwarding variant of the dev command, or `None`
/// when the script already pins a port or the dev server is not one of
/// the known port-aware tools. Yarn needs no `--` argument separator.
pub fn dev_with_port(kind: PackageManagerKind, dev_cmd: &str, script_body: &str) -> Option<String> {
    let body = script_body.to_lowercase();

    if body.contains("--port") {
        return None;
    }
    let short_flag = Regex::new(r"(^|\s)-p(\s|=|$)").expect("valid regex");
    if short_flag.is_match(&body) {
        return None;
    }
    if !PORT_AWARE_TOOLS.iter().any(|tool| body.contains(tool)) {
        return None;
    }

    match kind {
        PackageManagerKind::Yarn => Some(format!("{dev_cmd} --port \"${{PORT}}\"")),
        _ => Some(format!("{dev_cmd} -- --port \"${{PORT}}\"")),
    }
}
