//! Pipeline orchestration

pub mod orchestrator;

pub use orchestrator::{
    run_patch, run_scaffold, PatchOptions, PatchSummary, ScaffoldOptions, ScaffoldSummary,
};
