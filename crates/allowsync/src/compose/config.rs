use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ComposeError;

/// Name of the compose configuration kept at the root of the private repository.
pub const CONFIG_FILE: &str = ".compose.yml";

/// Describes which parts of the private repository become the public one.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ComposeConfig {
    /// Top-level entries copied into the public repository.
    pub entries: Vec<PathBuf>,
    /// File or directory names skipped while copying entries.
    pub no_copy: Vec<PathBuf>,
    /// Public entries that survive pruning even though they are not copied.
    pub no_remove: Vec<PathBuf>,
    /// Extra workspace members appended after the entries.
    pub workspace_tools: Vec<PathBuf>,
}

impl ComposeConfig {
    pub fn load(path: &Path) -> Result<Self, ComposeError> {
        let raw = fs::read_to_string(path).map_err(|source| ComposeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ComposeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lists_default_to_empty() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "entries:\n  - problems\n  - tools/testing\n").unwrap();

        let config = ComposeConfig::load(&path).unwrap();
        assert_eq!(
            config.entries,
            vec![PathBuf::from("problems"), PathBuf::from("tools/testing")]
        );
        assert!(config.no_copy.is_empty());
        assert!(config.no_remove.is_empty());
        assert!(config.workspace_tools.is_empty());
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "entries: [unterminated\n").unwrap();

        let err = ComposeConfig::load(&path).unwrap_err();
        assert!(matches!(err, ComposeError::ConfigParse { .. }));
    }

    #[test]
    fn absent_config_is_a_read_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = ComposeConfig::load(&temp.path().join(CONFIG_FILE)).unwrap_err();
        assert!(matches!(err, ComposeError::ConfigRead { .. }));
    }
}
