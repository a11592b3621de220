//! Script rendering and user-block preservation
//!
//! Generated scripts are modeled as a template plus named overlay
//! regions. Regeneration extracts the regions of the existing file into
//! a name -> body map and injects those bodies into the fresh template,
//! so user edits survive even when surrounding template text changes.
//! The merge is idempotent. Blocks removed from the template are
//! silently dropped.

pub mod templates;

pub use templates::{TemplateSource, DEV_TEMPLATE_NAME, SETUP_TEMPLATE_NAME};

use crate::error::{BootstrapError, Result};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const RESOURCE_PLAN_PLACEHOLDER: &str = "__BAKERY_RESOURCE_PLAN_CSV__";
const NUM_RESOURCES_PLACEHOLDER: &str = "__BAKERY_EXPECTED_NUM_RESOURCES__";

/// Matches one named user block. The regex crate has no backreferences,
/// so the start and end names are captured separately and compared in
/// code; pairs with mismatched names are left untouched.
fn user_block_re() -> Regex {
    Regex::new(
        r"(?s)(# >>> BAKERY USER:([A-Z_]+) START\n)(.*?)(# <<< BAKERY USER:([A-Z_]+) END)",
    )
    .expect("valid regex")
}

/// Extracts every well-formed user block as name -> body.
pub fn extract_user_blocks(content: &str) -> HashMap<String, String> {
    let mut blocks = HashMap::new();
    for caps in user_block_re().captures_iter(content) {
        let start_name = &caps[2];
        let end_name = &caps[5];
        if start_name == end_name {
            blocks.insert(start_name.to_string(), caps[3].to_string());
        }
    }
    blocks
}

/// Injects previously captured block bodies into a fresh template.
/// Blocks without a prior counterpart keep their template default.
pub fn merge_user_blocks(template: &str, existing: Option<&str>) -> String {
    let existing = match existing {
        Some(text) => text,
        None => return template.to_string(),
    };
    let previous = extract_user_blocks(existing);

    user_block_re()
        .replace_all(template, |caps: &Captures| {
            let start_name = &caps[2];
            let end_name = &caps[5];
            if start_name != end_name {
                return caps[0].to_string();
            }
            let body = previous
                .get(start_name)
                .map(String::as_str)
                .unwrap_or(&caps[3]);
            format!("{}{}{}", &caps[1], body, &caps[4])
        })
        .into_owned()
}

/// Substitutes the setup-script placeholders with the computed plan.
pub fn render_setup_script(template: &str, resource_plan: &[&str]) -> String {
    template
        .replace(RESOURCE_PLAN_PLACEHOLDER, &resource_plan.join(","))
        .replace(NUM_RESOURCES_PLACEHOLDER, &resource_plan.len().to_string())
}

/// Merges against any prior file at `dest`, writes the result, and
/// marks it executable.
pub fn write_script(dest: &Path, rendered: &str) -> Result<()> {
    let existing = fs::read_to_string(dest).ok();
    let merged = merge_user_blocks(rendered, existing.as_deref());

    fs::write(dest, &merged).map_err(|source| BootstrapError::FileWrite {
        path: dest.to_path_buf(),
        source,
    })?;
    mark_executable(dest)?;

    debug!(path = %dest.display(), merged_prior = existing.is_some(), "Script written");
    Ok(())
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|source| {
        BootstrapError::FileWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "header\n\
        # >>> BAKERY USER:ENV START\n\
        # defaults\n\
        # <<< BAKERY USER:ENV END\n\
        middle\n\
        # >>> BAKERY USER:POST_SETUP START\n\
        # more defaults\n\
        # <<< BAKERY USER:POST_SETUP END\n\
        footer\n";

    #[test]
    fn test_extract_user_blocks() {
        let blocks = extract_user_blocks(TEMPLATE);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks["ENV"], "# defaults\n");
        assert_eq!(blocks["POST_SETUP"], "# more defaults\n");
    }

    #[test]
    fn test_extract_skips_mismatched_pair() {
        let text = "# >>> BAKERY USER:FOO START\nx\n# <<< BAKERY USER:BAR END\n";
        assert!(extract_user_blocks(text).is_empty());
    }

    #[test]
    fn test_merge_preserves_edited_body() {
        let edited = TEMPLATE.replace("# defaults\n", "export FOO=1\nexport BAR=2\n");
        let merged = merge_user_blocks(TEMPLATE, Some(&edited));
        assert!(merged.contains("export FOO=1\nexport BAR=2\n"));
        assert!(merged.contains("# more defaults\n"));
        assert!(merged.starts_with("header\n"));
    }

    #[test]
    fn test_merge_without_existing_keeps_defaults() {
        assert_eq!(merge_user_blocks(TEMPLATE, None), TEMPLATE);
    }

    #[test]
    fn test_merge_new_block_falls_back_to_template_default() {
        // Existing file predates the POST_SETUP block.
        let old = "# >>> BAKERY USER:ENV START\ncustom\n# <<< BAKERY USER:ENV END\n";
        let merged = merge_user_blocks(TEMPLATE, Some(old));
        assert!(merged.contains("custom\n"));
        assert!(merged.contains("# more defaults\n"));
    }

    #[test]
    fn test_merge_drops_blocks_removed_from_template() {
        let old = "# >>> BAKERY USER:GONE START\nlost\n# <<< BAKERY USER:GONE END\n";
        let merged = merge_user_blocks(TEMPLATE, Some(old));
        assert!(!merged.contains("lost"));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let edited = TEMPLATE.replace("# defaults\n", "X\n");
        let once = merge_user_blocks(TEMPLATE, Some(&edited));
        let twice = merge_user_blocks(TEMPLATE, Some(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_render_setup_script_placeholders() {
        let template = "plan=__BAKERY_RESOURCE_PLAN_CSV__ n=__BAKERY_EXPECTED_NUM_RESOURCES__";
        let rendered = render_setup_script(template, &["app", "db", "dbTool"]);
        assert_eq!(rendered, "plan=app,db,dbTool n=3");
    }

    #[test]
    fn test_write_script_merges_and_sets_permissions() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("setup.sh");

        write_script(&dest, TEMPLATE).unwrap();
        let initial = fs::read_to_string(&dest).unwrap();
        assert_eq!(initial, TEMPLATE);

        let edited = initial.replace("# defaults\n", "edited\n");
        fs::write(&dest, &edited).unwrap();

        write_script(&dest, TEMPLATE).unwrap();
        let rewritten = fs::read_to_string(&dest).unwrap();
        assert!(rewritten.contains("edited\n"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&dest).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }
}
