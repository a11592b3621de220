//! Script template sources
//!
//! Default templates ship embedded in the binary; a templates directory
//! can override both. Template internals (provisioning logic, user
//! blocks) are an external artifact this tool only parametrizes.

use crate::error::{BootstrapError, Result};
use std::fs;
use std::path::PathBuf;

pub const SETUP_TEMPLATE_NAME: &str = "setup.sh";
pub const DEV_TEMPLATE_NAME: &str = "dev.sh";

const EMBEDDED_SETUP: &str = include_str!("../../assets/templates/setup.sh");
const EMBEDDED_DEV: &str = include_str!("../../assets/templates/dev.sh");

/// Where script templates come from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Embedded,
    Dir(PathBuf),
}

impl TemplateSource {
    pub fn from_flag(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(path) => Self::Dir(path),
            None => Self::Embedded,
        }
    }

    pub fn load(&self, name: &str) -> Result<String> {
        match self {
            Self::Embedded => match name {
                SETUP_TEMPLATE_NAME => Ok(EMBEDDED_SETUP.to_string()),
                DEV_TEMPLATE_NAME => Ok(EMBEDDED_DEV.to_string()),
                _ => Err(BootstrapError::TemplateNotFound(PathBuf::from(name))),
            },
            Self::Dir(dir) => {
                let path = dir.join(name);
                if !path.is_file() {
                    return Err(BootstrapError::TemplateNotFound(path));
                }
                fs::read_to_string(&path)
                    .map_err(|source| BootstrapError::FileRead { path, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_templates_carry_markers() {
        let source = TemplateSource::Embedded;
        let setup = source.load(SETUP_TEMPLATE_NAME).unwrap();
        assert!(setup.contains("__BAKERY_RESOURCE_PLAN_CSV__"));
        assert!(setup.contains("__BAKERY_EXPECTED_NUM_RESOURCES__"));
        assert!(setup.contains("# >>> BAKERY USER:"));

        let dev = source.load(DEV_TEMPLATE_NAME).unwrap();
        assert!(dev.contains("# >>> BAKERY USER:"));
        assert!(dev.contains(".bakery-runtime.json"));
    }

    #[test]
    fn test_dir_source_overrides() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("setup.sh"), "#!/bin/sh\n").unwrap();

        let source = TemplateSource::Dir(dir.path().to_path_buf());
        assert_eq!(source.load("setup.sh").unwrap(), "#!/bin/sh\n");
        assert!(matches!(
            source.load("dev.sh").unwrap_err(),
            BootstrapError::TemplateNotFound(_)
        ));
    }
}
