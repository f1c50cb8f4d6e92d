use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::ImportError;

/// File name of the allow-list kept inside every problem directory.
pub const MANIFEST_FILE: &str = ".allowlist";

/// Ordered, de-duplicated list of relative paths a problem accepts from a solution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<PathBuf>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ImportError> {
        let raw = fs::read_to_string(path).map_err(|source| ImportError::ManifestUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    /// Parses one path per line. Blank lines are skipped and repeated entries keep
    /// their first position.
    pub fn parse(raw: &str) -> Result<Self, ImportError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (index, line) in raw.lines().enumerate() {
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }

            let path = normalize_entry(entry, index + 1)?;
            if seen.insert(path.clone()) {
                entries.push(path);
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_entry(entry: &str, line: usize) -> Result<PathBuf, ImportError> {
    let invalid = || ImportError::InvalidManifestEntry {
        line,
        entry: entry.to_string(),
    };

    let mut normalized = PathBuf::new();
    for component in Path::new(entry).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid());
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(manifest: &Manifest) -> Vec<&str> {
        manifest
            .entries()
            .iter()
            .map(|p| p.to_str().unwrap())
            .collect()
    }

    #[test]
    fn parse_preserves_order() {
        let manifest = Manifest::parse("src/lib.rs\nCargo.toml\nsrc/bin/main.rs\n").unwrap();
        assert_eq!(
            paths(&manifest),
            vec!["src/lib.rs", "Cargo.toml", "src/bin/main.rs"]
        );
    }

    #[test]
    fn parse_skips_blank_lines_and_duplicates() {
        let manifest = Manifest::parse("\n  a.txt  \r\n\nsub/b.txt\n./a.txt\n\t\n").unwrap();
        assert_eq!(paths(&manifest), vec!["a.txt", "sub/b.txt"]);
    }

    #[test]
    fn parse_of_empty_manifest_is_empty() {
        let manifest = Manifest::parse("\n\n").unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.len(), 0);
    }

    #[test]
    fn parse_rejects_escaping_entries() {
        for raw in ["../secret.rs", "src/../../x", "/etc/passwd", "."] {
            let err = Manifest::parse(&format!("ok.rs\n{raw}\n")).unwrap_err();
            match err {
                ImportError::InvalidManifestEntry { line, entry } => {
                    assert_eq!(line, 2);
                    assert_eq!(entry, raw);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn load_reports_unreadable_manifest() {
        let temp = tempfile::tempdir().unwrap();
        let err = Manifest::load(&temp.path().join(MANIFEST_FILE)).unwrap_err();
        assert!(matches!(err, ImportError::ManifestUnreadable { .. }));
    }
}
