//! End-to-end tests for the full patch pipeline

use bakery_bootstrap::pipeline::{run_patch, PatchOptions};
use bakery_bootstrap::render::TemplateSource;
use bakery_bootstrap::BootstrapError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_pnpm_postgres_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let base = dir.path();

    fs::write(
        base.join("package.json"),
        r#"{
  "name": "@acme/storefront",
  "version": "1.0.0",
  "scripts": {
    "dev": "next dev",
    "db:migrate": "prisma migrate deploy",
    "db:seed": "prisma db seed",
    "db:studio": "prisma studio"
  }
}"#,
    )
    .unwrap();

    fs::write(base.join("pnpm-lock.yaml"), "lockfileVersion: 9\n").unwrap();

    fs::write(
        base.join("docker-compose.yml"),
        "services:\n  db:\n    image: postgres:15\n    ports:\n      - \"5432:5432\"\n",
    )
    .unwrap();

    fs::create_dir(base.join("src")).unwrap();
    fs::write(
        base.join("src/server.ts"),
        "const port = process.env.DATABASE_PORT;\n",
    )
    .unwrap();

    dir
}

fn default_opts(target: &Path) -> PatchOptions {
    PatchOptions {
        target: target.to_path_buf(),
        package_manager: None,
        dev_cmd: None,
        migrate_cmd: None,
        seed_cmd: None,
        db_tool_cmd: None,
        db_provider: None,
        compose_file: None,
        db_service: None,
        templates: TemplateSource::Embedded,
    }
}

#[test]
fn test_patch_pnpm_postgres_project() {
    let project = create_pnpm_postgres_project();
    let summary = run_patch(&default_opts(project.path())).unwrap();

    assert_eq!(summary.package_manager.as_str(), "pnpm");
    assert_eq!(summary.db_provider.as_str(), "postgres");
    assert_eq!(summary.resource_plan, ["app", "db", "dbTool"]);

    assert!(project.path().join("setup.sh").is_file());
    assert!(project.path().join("dev.sh").is_file());

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(project.path().join(".bakery-runtime.json")).unwrap(),
    )
    .unwrap();

    assert_eq!(manifest["version"], 1);
    assert_eq!(manifest["packageManager"], "pnpm");
    assert_eq!(manifest["commands"]["install"], "pnpm install");
    assert_eq!(manifest["commands"]["dev"], "pnpm run dev");
    assert_eq!(
        manifest["commands"]["devWithPort"],
        "pnpm run dev -- --port \"${PORT}\""
    );
    assert_eq!(manifest["commands"]["migrate"], "pnpm run db:migrate");
    assert_eq!(manifest["commands"]["seed"], "pnpm run db:seed");
    assert_eq!(manifest["commands"]["dbTool"], "pnpm run db:studio");
    assert_eq!(manifest["database"]["provider"], "postgres");
    assert_eq!(manifest["database"]["dockerized"], true);
    assert_eq!(manifest["database"]["composeFile"], "docker-compose.yml");
    assert_eq!(manifest["database"]["serviceName"], "db");
    assert_eq!(manifest["bakery"]["defaultNumResources"], 3);
    assert_eq!(manifest["meta"]["repoSlug"], "storefront");

    let port_keys: Vec<String> = manifest["env"]["portKeys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(port_keys[0], "PORT");
    assert!(port_keys.contains(&"DATABASE_PORT".to_string()));
}

#[test]
fn test_patch_scripts_are_executable() {
    let project = create_pnpm_postgres_project();
    run_patch(&default_opts(project.path())).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        for script in ["setup.sh", "dev.sh"] {
            let mode = fs::metadata(project.path().join(script))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o111, 0o111, "{script} should be executable");
        }
    }
}

#[test]
fn test_rerun_preserves_user_block_edits() {
    let project = create_pnpm_postgres_project();
    run_patch(&default_opts(project.path())).unwrap();

    let setup_path = project.path().join("setup.sh");
    let generated = fs::read_to_string(&setup_path).unwrap();
    let edited = generated.replace(
        "# Export worktree-specific environment variables here.",
        "export DATABASE_URL=postgres://localhost:5432/app",
    );
    assert_ne!(generated, edited);
    fs::write(&setup_path, &edited).unwrap();

    run_patch(&default_opts(project.path())).unwrap();
    let after_first = fs::read_to_string(&setup_path).unwrap();
    assert!(after_first.contains("export DATABASE_URL=postgres://localhost:5432/app"));

    run_patch(&default_opts(project.path())).unwrap();
    let after_second = fs::read_to_string(&setup_path).unwrap();
    assert_eq!(after_first, after_second, "merge must be idempotent");
}

#[test]
fn test_patch_sqlite_project_has_no_db_resource() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{
  "name": "notes",
  "scripts": {"dev": "vite"},
  "dependencies": {"better-sqlite3": "^11"}
}"#,
    )
    .unwrap();

    let summary = run_patch(&default_opts(dir.path())).unwrap();
    assert_eq!(summary.db_provider.as_str(), "sqlite");
    assert_eq!(summary.resource_plan, ["app"]);

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join(".bakery-runtime.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["database"]["dockerized"], false);
    assert_eq!(manifest["database"]["composeFile"], serde_json::Value::Null);
    assert_eq!(manifest["database"]["serviceName"], serde_json::Value::Null);
}

#[test]
fn test_patch_with_overrides() {
    let project = create_pnpm_postgres_project();

    let mut opts = default_opts(project.path());
    opts.package_manager = Some("yarn".to_string());
    opts.dev_cmd = Some("node server.js".to_string());
    opts.db_tool_cmd = Some("none".to_string());
    opts.db_service = Some("postgres-main".to_string());

    let summary = run_patch(&opts).unwrap();
    assert_eq!(summary.package_manager.as_str(), "yarn");
    assert_eq!(summary.resource_plan, ["app", "db"]);

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(project.path().join(".bakery-runtime.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["commands"]["dev"], "node server.js");
    assert_eq!(manifest["commands"]["dbTool"], serde_json::Value::Null);
    // "node server.js" is not a known port-aware dev server.
    assert_eq!(manifest["commands"]["devWithPort"], serde_json::Value::Null);
    assert_eq!(manifest["database"]["serviceName"], "postgres-main");
}

#[test]
fn test_patch_explicit_provider_without_compose_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"scripts": {"dev": "vite"}}"#,
    )
    .unwrap();

    let mut opts = default_opts(dir.path());
    opts.db_provider = Some(bakery_bootstrap::DbProvider::Mysql);

    let err = run_patch(&opts).unwrap_err();
    assert!(matches!(err, BootstrapError::ComposeRequired(_)));
    assert!(err.to_string().contains("mysql"));
    assert!(err.to_string().contains("compose"));
}

#[test]
fn test_patch_missing_package_json_fails() {
    let dir = TempDir::new().unwrap();
    let err = run_patch(&default_opts(dir.path())).unwrap_err();
    assert!(matches!(err, BootstrapError::MissingPackageJson));
}
