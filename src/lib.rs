//! bakery-bootstrap - worktree bootstrap patcher for Node repositories
//!
//! Inspects an arbitrary Node-style project checkout and produces the
//! runtime manifest (`.bakery-runtime.json`) plus the two generated
//! shell scripts (`setup.sh`, `dev.sh`) that the Bakery worktree
//! platform uses to provision and run the project without human
//! configuration.
//!
//! # Core Concepts
//!
//! - **Detection**: pure, ordered heuristics over static evidence -
//!   lockfiles, `package.json` scripts, compose file keywords,
//!   dependency names, env-key naming patterns
//! - **Resource Plan**: the ordered list of logical roles (`app`, `db`,
//!   `dbTool`) the orchestrator must allocate for a worktree
//! - **User Blocks**: named, delimiter-bounded regions of the generated
//!   scripts whose contents survive regeneration, so a re-run never
//!   clobbers manual edits
//!
//! # Example Usage
//!
//! ```no_run
//! use bakery_bootstrap::pipeline::{run_patch, PatchOptions};
//! use bakery_bootstrap::render::TemplateSource;
//! use std::path::PathBuf;
//!
//! let opts = PatchOptions {
//!     target: PathBuf::from("/work/my-repo"),
//!     package_manager: None,
//!     dev_cmd: None,
//!     migrate_cmd: None,
//!     seed_cmd: None,
//!     db_tool_cmd: None,
//!     db_provider: None,
//!     compose_file: None,
//!     db_service: None,
//!     templates: TemplateSource::Embedded,
//! };
//! let summary = run_patch(&opts)?;
//! println!("plan: {}", summary.resource_plan.join(","));
//! # Ok::<(), bakery_bootstrap::BootstrapError>(())
//! ```

pub mod cli;
pub mod detect;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod plan;
pub mod project;
pub mod render;

pub use detect::compose::DbProvider;
pub use detect::package_manager::PackageManagerKind;
pub use error::BootstrapError;
pub use manifest::RuntimeManifest;
pub use pipeline::{run_patch, run_scaffold, PatchOptions, ScaffoldOptions};
pub use project::ProjectDescriptor;

/// Skill name used in all operator-facing output lines.
pub const SKILL_NAME: &str = "bakery-worktree-bootstrap";

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
