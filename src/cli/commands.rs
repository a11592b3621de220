use crate::detect::compose::DbProvider;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Worktree bootstrap patcher for Node repositories
#[derive(Parser, Debug)]
#[command(
    name = "bakery-bootstrap",
    about = "Detects how a Node repo runs and generates its setup/dev scripts",
    version,
    long_about = "bakery-bootstrap inspects a Node-style project checkout (lockfiles, \
                  package.json scripts, compose files, env keys) and generates the \
                  runtime manifest and shell scripts the Bakery worktree platform uses \
                  to provision and run it. Re-running preserves user edits inside the \
                  named BAKERY USER blocks of previously generated scripts."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Verbose logging (debug level)")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Full patch: manifest, setup.sh and dev.sh",
        long_about = "Runs the full detection pipeline and writes .bakery-runtime.json, \
                      setup.sh and dev.sh into the target repository.\n\n\
                      Examples:\n  \
                      bakery-bootstrap patch\n  \
                      bakery-bootstrap patch /path/to/repo --db-provider postgres\n  \
                      bakery-bootstrap patch --dev-cmd 'node server.js' --seed-cmd none"
    )]
    Patch(PatchArgs),

    #[command(
        about = "Setup-only scaffolding: resource plan and setup.sh",
        long_about = "Derives the resource plan and writes setup.sh only. Full-mode \
                      flags are accepted for compatibility but ignored with a warning.\n\n\
                      Examples:\n  \
                      bakery-bootstrap scaffold\n  \
                      bakery-bootstrap scaffold /path/to/repo --db-tool-cmd none"
    )]
    Scaffold(ScaffoldArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct PatchArgs {
    #[arg(
        value_name = "PATH",
        help = "Target repository (defaults to current directory)"
    )]
    pub target: Option<PathBuf>,

    #[arg(long, value_name = "PM", help = "Package manager override (pnpm, npm, yarn, bun)")]
    pub package_manager: Option<String>,

    #[arg(long, value_name = "CMD", help = "Explicit dev command")]
    pub dev_cmd: Option<String>,

    #[arg(long, value_name = "CMD", help = "Explicit migrate command; 'none' disables")]
    pub migrate_cmd: Option<String>,

    #[arg(long, value_name = "CMD", help = "Explicit seed command; 'none' disables")]
    pub seed_cmd: Option<String>,

    #[arg(long, value_name = "CMD", help = "Explicit DB tool command; 'none' disables")]
    pub db_tool_cmd: Option<String>,

    #[arg(long, value_enum, default_value = "auto", help = "Database provider")]
    pub db_provider: DbProviderArg,

    #[arg(long, value_name = "FILE", help = "Compose file path")]
    pub compose_file: Option<String>,

    #[arg(long, value_name = "NAME", help = "Compose service name of the database")]
    pub db_service: Option<String>,

    #[arg(long, value_name = "DIR", help = "Load script templates from this directory")]
    pub templates_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ScaffoldArgs {
    #[arg(
        value_name = "PATH",
        help = "Target repository (defaults to current directory)"
    )]
    pub target: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "auto", help = "Database provider")]
    pub db_provider: DbProviderArg,

    #[arg(long, value_name = "FILE", help = "Compose file path")]
    pub compose_file: Option<String>,

    #[arg(long, value_name = "CMD", help = "Explicit DB tool command; 'none' disables")]
    pub db_tool_cmd: Option<String>,

    #[arg(long, value_name = "DIR", help = "Load script templates from this directory")]
    pub templates_dir: Option<PathBuf>,

    #[arg(long, value_name = "PM", help = "(deprecated) Ignored in setup-only mode")]
    pub package_manager: Option<String>,

    #[arg(long, value_name = "CMD", help = "(deprecated) Ignored in setup-only mode")]
    pub dev_cmd: Option<String>,

    #[arg(long, value_name = "NAME", help = "(deprecated) Ignored in setup-only mode")]
    pub db_service: Option<String>,

    #[arg(long, value_name = "CMD", help = "(deprecated) Ignored in setup-only mode")]
    pub migrate_cmd: Option<String>,

    #[arg(long, value_name = "CMD", help = "(deprecated) Ignored in setup-only mode")]
    pub seed_cmd: Option<String>,
}

impl ScaffoldArgs {
    /// Deprecated full-mode flags that were actually supplied (blank
    /// values do not count), by flag name.
    pub fn deprecated_flags_provided(&self) -> Vec<&'static str> {
        let fields: [(&'static str, Option<&String>); 5] = [
            ("--package-manager", self.package_manager.as_ref()),
            ("--dev-cmd", self.dev_cmd.as_ref()),
            ("--db-service", self.db_service.as_ref()),
            ("--migrate-cmd", self.migrate_cmd.as_ref()),
            ("--seed-cmd", self.seed_cmd.as_ref()),
        ];
        fields
            .into_iter()
            .filter(|(_, value)| value.is_some_and(|v| !v.trim().is_empty()))
            .map(|(flag, _)| flag)
            .collect()
    }
}

/// CLI-facing provider choice; `auto` is resolved to a concrete
/// provider before anything is stored.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProviderArg {
    Auto,
    Postgres,
    Mysql,
    Sqlite,
    None,
}

impl DbProviderArg {
    /// `None` when the provider should be inferred.
    pub fn explicit(self) -> Option<DbProvider> {
        match self {
            DbProviderArg::Auto => Option::None,
            DbProviderArg::Postgres => Some(DbProvider::Postgres),
            DbProviderArg::Mysql => Some(DbProvider::Mysql),
            DbProviderArg::Sqlite => Some(DbProvider::Sqlite),
            DbProviderArg::None => Some(DbProvider::None),
        }
    }
}
