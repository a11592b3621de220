//! Subcommand handlers
//!
//! Each handler runs its pipeline, prints the human-readable summary on
//! success, and turns any fatal error into the single-line
//! `[bakery-worktree-bootstrap] ERROR: ...` message with a non-zero
//! exit code.

use crate::cli::commands::{PatchArgs, ScaffoldArgs};
use crate::pipeline::{run_patch, run_scaffold, PatchOptions, ScaffoldOptions};
use crate::render::TemplateSource;
use crate::SKILL_NAME;
use std::path::PathBuf;
use tracing::error;

pub fn handle_patch(args: &PatchArgs) -> i32 {
    let opts = PatchOptions {
        target: target_or_cwd(args.target.clone()),
        package_manager: args.package_manager.clone(),
        dev_cmd: args.dev_cmd.clone(),
        migrate_cmd: args.migrate_cmd.clone(),
        seed_cmd: args.seed_cmd.clone(),
        db_tool_cmd: args.db_tool_cmd.clone(),
        db_provider: args.db_provider.explicit(),
        compose_file: args.compose_file.clone(),
        db_service: args.db_service.clone(),
        templates: TemplateSource::from_flag(args.templates_dir.clone()),
    };

    match run_patch(&opts) {
        Ok(summary) => {
            println!("[{SKILL_NAME}] Patch complete");
            println!("- mode: full");
            println!("- package manager: {}", summary.package_manager);
            println!("- db provider: {}", summary.db_provider);
            println!("- resource roles: {}", summary.resource_plan.join(","));
            println!("- setup.sh: {}", summary.setup_path.display());
            println!("- dev.sh: {}", summary.dev_path.display());
            println!("- manifest: {}", summary.manifest_path.display());
            0
        }
        Err(err) => fail(&err.to_string()),
    }
}

pub fn handle_scaffold(args: &ScaffoldArgs) -> i32 {
    let ignored = args.deprecated_flags_provided();
    if !ignored.is_empty() {
        println!(
            "[{SKILL_NAME}] WARN: Ignoring deprecated options for setup-only scaffolding: {}",
            ignored.join(", ")
        );
    }

    let opts = ScaffoldOptions {
        target: target_or_cwd(args.target.clone()),
        db_tool_cmd: args.db_tool_cmd.clone(),
        db_provider: args.db_provider.explicit(),
        compose_file: args.compose_file.clone(),
        templates: TemplateSource::from_flag(args.templates_dir.clone()),
    };

    match run_scaffold(&opts) {
        Ok(summary) => {
            println!("[{SKILL_NAME}] Patch complete");
            println!("- mode: setup-only scaffolding");
            println!("- db provider: {}", summary.db_provider);
            println!("- frozen resource roles: {}", summary.resource_plan.join(","));
            println!("- setup.sh: {}", summary.setup_path.display());
            println!("- managed outputs: setup.sh only");
            0
        }
        Err(err) => fail(&err.to_string()),
    }
}

fn target_or_cwd(target: Option<PathBuf>) -> PathBuf {
    target.unwrap_or_else(|| PathBuf::from("."))
}

fn fail(message: &str) -> i32 {
    error!(error = %message, "Fatal");
    eprintln!("[{SKILL_NAME}] ERROR: {message}");
    1
}
