//! One-pass orchestration of detection and generation
//!
//! Both modes share the same inference code and differ only in how much
//! of it runs and which files are written: `patch` is the full pipeline
//! (manifest + setup.sh + dev.sh), `scaffold` is setup-only (resource
//! plan + setup.sh). All detection completes before any destination
//! file is touched; the two scripts are then written sequentially, each
//! after its own render+merge.

use crate::detect::compose::{
    detect_compose_file, infer_db_provider, infer_service_name, ComposeReference, DbProvider,
};
use crate::detect::package_manager::{self, PackageManagerKind};
use crate::detect::ports::scan_port_keys;
use crate::detect::scripts::{
    detect_script_name, dev_with_port, resolve_command, CommandSetting, DB_TOOL_CANDIDATES,
    DEV_CANDIDATES, MIGRATE_CANDIDATES, SEED_CANDIDATES,
};
use crate::error::{BootstrapError, Result};
use crate::manifest::{
    manifest_compose_path, BakeryInfo, CommandTable, DatabaseInfo, EnvInfo, MetaInfo,
    RuntimeManifest, MANIFEST_VERSION,
};
use crate::plan::compute_resource_plan;
use crate::project::ProjectDescriptor;
use crate::render::{
    render_setup_script, write_script, TemplateSource, DEV_TEMPLATE_NAME, SETUP_TEMPLATE_NAME,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct PatchOptions {
    pub target: PathBuf,
    pub package_manager: Option<String>,
    pub dev_cmd: Option<String>,
    pub migrate_cmd: Option<String>,
    pub seed_cmd: Option<String>,
    pub db_tool_cmd: Option<String>,
    /// `None` means auto-infer.
    pub db_provider: Option<DbProvider>,
    pub compose_file: Option<String>,
    pub db_service: Option<String>,
    pub templates: TemplateSource,
}

#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub target: PathBuf,
    pub db_tool_cmd: Option<String>,
    pub db_provider: Option<DbProvider>,
    pub compose_file: Option<String>,
    pub templates: TemplateSource,
}

#[derive(Debug)]
pub struct PatchSummary {
    pub package_manager: PackageManagerKind,
    pub db_provider: DbProvider,
    pub resource_plan: Vec<String>,
    pub setup_path: PathBuf,
    pub dev_path: PathBuf,
    pub manifest_path: PathBuf,
}

#[derive(Debug)]
pub struct ScaffoldSummary {
    pub db_provider: DbProvider,
    pub resource_plan: Vec<String>,
    pub setup_path: PathBuf,
}

/// Full mode: detect everything, write manifest and both scripts.
pub fn run_patch(opts: &PatchOptions) -> Result<PatchSummary> {
    let project_dir = resolve_target(&opts.target)?;
    let pkg = ProjectDescriptor::load(&project_dir)?;
    let scripts = pkg.scripts();

    let kind = package_manager::resolve(opts.package_manager.as_deref(), &project_dir, &pkg)?;
    info!(package_manager = %kind, "Package manager resolved");

    let dev_setting = CommandSetting::from_flag(opts.dev_cmd.as_deref());
    let dev_cmd = resolve_command(&dev_setting, kind, &scripts, &DEV_CANDIDATES)
        .ok_or(BootstrapError::DevCommandUnresolved)?;
    let dev_body = match &dev_setting {
        CommandSetting::Explicit(cmd) => cmd.clone(),
        _ => detect_script_name(&scripts, &DEV_CANDIDATES)
            .and_then(|name| scripts.get(name).cloned())
            .unwrap_or_default(),
    };
    let dev_port_cmd = dev_with_port(kind, &dev_cmd, &dev_body);

    let migrate_cmd = resolve_command(
        &CommandSetting::from_flag(opts.migrate_cmd.as_deref()),
        kind,
        &scripts,
        &MIGRATE_CANDIDATES,
    );
    let seed_cmd = resolve_command(
        &CommandSetting::from_flag(opts.seed_cmd.as_deref()),
        kind,
        &scripts,
        &SEED_CANDIDATES,
    );
    let db_tool_cmd = resolve_command(
        &CommandSetting::from_flag(opts.db_tool_cmd.as_deref()),
        kind,
        &scripts,
        &DB_TOOL_CANDIDATES,
    );

    let compose = detect_compose_file(&project_dir, opts.compose_file.as_deref())?;
    let provider = infer_provider(opts.db_provider, &pkg, compose.as_ref())?;
    let service_name = provider
        .is_dockerized()
        .then(|| infer_service_name(opts.db_service.as_deref(), compose_text(compose.as_ref())));

    let plan = compute_resource_plan(provider, db_tool_cmd.is_some());
    let port_keys = scan_port_keys(&project_dir);

    // Detection is done; everything below writes to the target.
    let setup_template = opts.templates.load(SETUP_TEMPLATE_NAME)?;
    let setup_path = project_dir.join(SETUP_TEMPLATE_NAME);
    write_script(&setup_path, &render_setup_script(&setup_template, &plan))?;

    let dev_template = opts.templates.load(DEV_TEMPLATE_NAME)?;
    let dev_path = project_dir.join(DEV_TEMPLATE_NAME);
    write_script(&dev_path, &dev_template)?;

    let manifest = RuntimeManifest {
        version: MANIFEST_VERSION,
        package_manager: kind,
        commands: CommandTable {
            install: kind.install_command(),
            dev: dev_cmd,
            dev_with_port: dev_port_cmd,
            migrate: migrate_cmd,
            seed: seed_cmd,
            db_tool: db_tool_cmd,
        },
        database: DatabaseInfo {
            provider,
            dockerized: provider.is_dockerized(),
            compose_file: compose
                .as_ref()
                .map(|c| manifest_compose_path(&project_dir, &c.path)),
            service_name,
        },
        bakery: BakeryInfo {
            resource_plan: plan.iter().map(|r| r.to_string()).collect(),
            default_num_resources: plan.len(),
        },
        env: EnvInfo { port_keys },
        meta: MetaInfo {
            repo_slug: pkg.repo_slug(),
        },
    };
    let manifest_path = manifest.write(&project_dir)?;

    info!(provider = %provider, resources = plan.len(), "Patch complete");
    Ok(PatchSummary {
        package_manager: kind,
        db_provider: provider,
        resource_plan: plan.iter().map(|r| r.to_string()).collect(),
        setup_path,
        dev_path,
        manifest_path,
    })
}

/// Setup-only mode: resource plan plus setup.sh, nothing else.
pub fn run_scaffold(opts: &ScaffoldOptions) -> Result<ScaffoldSummary> {
    let project_dir = resolve_target(&opts.target)?;
    let pkg = ProjectDescriptor::load(&project_dir)?;

    let db_tool_enabled = match CommandSetting::from_flag(opts.db_tool_cmd.as_deref()) {
        CommandSetting::Explicit(_) => true,
        CommandSetting::Disabled => false,
        CommandSetting::Auto => detect_script_name(&pkg.scripts(), &DB_TOOL_CANDIDATES).is_some(),
    };

    let compose = detect_compose_file(&project_dir, opts.compose_file.as_deref())?;
    let provider = infer_provider(opts.db_provider, &pkg, compose.as_ref())?;

    let plan = compute_resource_plan(provider, db_tool_enabled);

    let setup_template = opts.templates.load(SETUP_TEMPLATE_NAME)?;
    let setup_path = project_dir.join(SETUP_TEMPLATE_NAME);
    write_script(&setup_path, &render_setup_script(&setup_template, &plan))?;

    info!(provider = %provider, resources = plan.len(), "Scaffold complete");
    Ok(ScaffoldSummary {
        db_provider: provider,
        resource_plan: plan.iter().map(|r| r.to_string()).collect(),
        setup_path,
    })
}

fn resolve_target(target: &Path) -> Result<PathBuf> {
    if !target.is_dir() {
        return Err(BootstrapError::TargetNotFound(target.to_path_buf()));
    }
    let canonical = target
        .canonicalize()
        .map_err(|_| BootstrapError::TargetNotFound(target.to_path_buf()))?;
    debug!(target = %canonical.display(), "Target resolved");
    Ok(canonical)
}

fn compose_text(compose: Option<&ComposeReference>) -> &str {
    compose.map(|c| c.content.as_str()).unwrap_or("")
}

/// A dockerized provider with no compose source is unsatisfiable.
fn infer_provider(
    explicit: Option<DbProvider>,
    pkg: &ProjectDescriptor,
    compose: Option<&ComposeReference>,
) -> Result<DbProvider> {
    let provider = infer_db_provider(explicit, pkg, compose_text(compose));
    if provider.is_dockerized() && compose.is_none() {
        return Err(BootstrapError::ComposeRequired(provider));
    }
    Ok(provider)
}
