//! Builds the public course repository from the private one.

mod config;
mod markers;

pub use config::{CONFIG_FILE, ComposeConfig};
pub use markers::{MarkerError, strip_private};

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::ComposeError;

#[derive(Clone, Debug, Default)]
pub struct ComposeOptions {
    /// Private repository holding `.compose.yml` and reference solutions.
    pub in_path: PathBuf,
    /// Public repository to refresh.
    pub out_path: PathBuf,
    /// Skip copying and only prune and rewrite the workspace manifest.
    pub no_process: bool,
    /// Additional public entries spared from pruning.
    pub spare: Vec<PathBuf>,
    /// Additional workspace tool members.
    pub add_tools: Vec<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ComposeReport {
    pub written: usize,
    pub pruned: Vec<PathBuf>,
    pub members: Vec<String>,
}

pub fn compose(options: &ComposeOptions) -> Result<ComposeReport, ComposeError> {
    let config = ComposeConfig::load(&options.in_path.join(CONFIG_FILE))?;
    fs::create_dir_all(&options.out_path)
        .map_err(|err| ComposeError::io("create directory", &options.out_path, err))?;

    let written = if options.no_process {
        0
    } else {
        copy_entries(options, &config)?
    };
    info!("wrote {written} file(s) into {}", options.out_path.display());

    let pruned = prune_entries(options, &config)?;
    info!("pruned {} stale entries", pruned.len());

    let members = write_workspace_manifest(options, &config)?;
    info!("workspace lists {} member(s)", members.len());

    Ok(ComposeReport {
        written,
        pruned,
        members,
    })
}

fn copy_entries(options: &ComposeOptions, config: &ComposeConfig) -> Result<usize, ComposeError> {
    let excluded: HashSet<OsString> = config
        .no_copy
        .iter()
        .map(|path| path.clone().into_os_string())
        .collect();

    let mut written = 0;
    for entry in &config.entries {
        let source_root = options.in_path.join(entry);
        let target_root = options.out_path.join(entry);

        let walker = WalkDir::new(&source_root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|item| item.depth() == 0 || !excluded.contains(item.file_name()));
        for item in walker {
            let item = item.map_err(|source| ComposeError::Walk {
                path: source_root.clone(),
                source,
            })?;
            if item.file_type().is_dir() {
                continue;
            }
            let Ok(relative) = item.path().strip_prefix(&source_root) else {
                continue;
            };
            let target = if relative.as_os_str().is_empty() {
                target_root.clone()
            } else {
                target_root.join(relative)
            };
            process_file(item.path(), &target)?;
            written += 1;
        }
    }
    Ok(written)
}

fn process_file(source: &Path, target: &Path) -> Result<(), ComposeError> {
    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir).map_err(|err| ComposeError::io("create directory", dir, err))?;
    }

    if source.extension() == Some(OsStr::new("rs")) {
        let content =
            fs::read_to_string(source).map_err(|err| ComposeError::io("read", source, err))?;
        let public = strip_private(&content).map_err(|err| ComposeError::Marker {
            path: source.to_path_buf(),
            source: err,
        })?;
        fs::write(target, public).map_err(|err| ComposeError::io("write", target, err))?;
    } else {
        fs::copy(source, target).map_err(|err| ComposeError::io("copy", source, err))?;
    }
    debug!("composed {}", target.display());
    Ok(())
}

fn top_level(path: &Path) -> Option<&OsStr> {
    path.components().find_map(|component| match component {
        Component::Normal(name) => Some(name),
        _ => None,
    })
}

fn prune_entries(
    options: &ComposeOptions,
    config: &ComposeConfig,
) -> Result<Vec<PathBuf>, ComposeError> {
    let spared: HashSet<&OsStr> = config
        .entries
        .iter()
        .chain(&config.no_remove)
        .chain(&options.spare)
        .filter_map(|path| top_level(path))
        .collect();

    let out = &options.out_path;
    let listing = fs::read_dir(out).map_err(|err| ComposeError::io("read directory", out, err))?;

    let mut pruned = Vec::new();
    for item in listing {
        let item = item.map_err(|err| ComposeError::io("read directory", out, err))?;
        let name = item.file_name();
        if spared.contains(name.as_os_str()) {
            continue;
        }

        let path = item.path();
        let is_dir = item
            .file_type()
            .map_err(|err| ComposeError::io("inspect", &path, err))?
            .is_dir();
        let removed = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|err| ComposeError::io("remove", &path, err))?;
        debug!("pruned {}", path.display());
        pruned.push(PathBuf::from(name));
    }
    pruned.sort();
    Ok(pruned)
}

fn member_name(path: &Path) -> Result<&str, ComposeError> {
    path.to_str()
        .ok_or_else(|| ComposeError::NonUtf8Entry(path.to_path_buf()))
}

fn write_workspace_manifest(
    options: &ComposeOptions,
    config: &ComposeConfig,
) -> Result<Vec<String>, ComposeError> {
    let mut problems = Vec::new();
    for entry in &config.entries {
        if options.out_path.join(entry).join("Cargo.toml").is_file() {
            problems.push(member_name(entry)?);
        }
    }

    let mut tools = Vec::new();
    for tool in config.workspace_tools.iter().chain(&options.add_tools) {
        tools.push(member_name(tool)?);
    }

    let mut manifest = String::from("[workspace]\nmembers = [\n    # Problems\n");
    for member in &problems {
        manifest.push_str(&format!("    \"{member}\",\n"));
    }
    manifest.push_str("\n    # Tools\n");
    for member in &tools {
        manifest.push_str(&format!("    \"{member}\",\n"));
    }
    manifest.push_str("]\n");

    let path = options.out_path.join("Cargo.toml");
    fs::write(&path, manifest).map_err(|err| ComposeError::io("write", &path, err))?;

    Ok(problems
        .into_iter()
        .chain(tools)
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn setup(config: &str) -> (TempDir, ComposeOptions) {
        let temp = tempfile::tempdir().unwrap();
        let private = temp.path().join("private");
        let public = temp.path().join("public");
        write(&private.join(CONFIG_FILE), config);
        let options = ComposeOptions {
            in_path: private,
            out_path: public,
            ..Default::default()
        };
        (temp, options)
    }

    #[test]
    fn compose_strips_copies_prunes_and_writes_workspace() {
        let (_temp, options) = setup(
            "entries:\n  - add\n  - README.md\nno_copy:\n  - target\nno_remove:\n  - .git\nworkspace_tools:\n  - tools/runner\n",
        );
        let private = &options.in_path;
        let public = &options.out_path;
        write(
            &private.join("add/src/lib.rs"),
            "pub fn add(a: i32, b: i32) -> i32 {\n    a + b // compose::private(unimplemented)\n}\n",
        );
        write(&private.join("add/Cargo.toml"), "[package]\nname = \"add\"\n");
        write(&private.join("add/target/debug/junk"), "junk");
        write(&private.join("README.md"), "# Course\n");
        write(&private.join("secret/answers.md"), "42");
        write(&public.join("stale/old.rs"), "old");
        write(&public.join(".git/HEAD"), "ref: refs/heads/main\n");

        let report = compose(&options).unwrap();

        assert_eq!(report.written, 3);
        assert_eq!(report.pruned, vec![PathBuf::from("stale")]);
        assert_eq!(report.members, vec!["add", "tools/runner"]);
        assert_eq!(
            fs::read_to_string(public.join("add/src/lib.rs")).unwrap(),
            "pub fn add(a: i32, b: i32) -> i32 {\n    // TODO: your code here.\n    unimplemented!()\n}\n"
        );
        assert_eq!(fs::read_to_string(public.join("README.md")).unwrap(), "# Course\n");
        assert!(!public.join("add/target").exists());
        assert!(!public.join("secret").exists());
        assert!(!public.join("stale").exists());
        assert!(public.join(".git/HEAD").exists());
        assert_eq!(
            fs::read_to_string(public.join("Cargo.toml")).unwrap(),
            "[workspace]\nmembers = [\n    # Problems\n    \"add\",\n\n    # Tools\n    \"tools/runner\",\n]\n"
        );
    }

    #[test]
    fn no_process_only_prunes_and_rewrites_manifest() {
        let (_temp, mut options) = setup("entries:\n  - add\n");
        options.no_process = true;
        options.spare = vec![PathBuf::from("docs")];
        options.add_tools = vec![PathBuf::from("checker")];
        write(&options.in_path.join("add/src/lib.rs"), "fn x() {}\n");
        write(&options.out_path.join("docs/index.md"), "docs");
        write(&options.out_path.join("notes.txt"), "notes");

        let report = compose(&options).unwrap();

        assert_eq!(report.written, 0);
        assert_eq!(report.pruned, vec![PathBuf::from("notes.txt")]);
        assert_eq!(report.members, vec!["checker"]);
        assert!(!options.out_path.join("add").exists());
        assert!(options.out_path.join("docs/index.md").exists());
    }

    #[test]
    fn marker_errors_name_the_file() {
        let (_temp, options) = setup("entries:\n  - broken\n");
        write(
            &options.in_path.join("broken/src/main.rs"),
            "// compose::end_private\n",
        );

        let err = compose(&options).unwrap_err();
        match err {
            ComposeError::Marker { path, source } => {
                assert!(path.ends_with("broken/src/main.rs"));
                assert_eq!(source, MarkerError::UnpairedEnd { line: 1 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_copied_through() {
        let (temp, options) = setup("entries:\n  - add\n");
        let shared = temp.path().join("shared");
        write(&shared.join("helpers.rs"), "fn helper() {} // compose::private\n");
        write(&options.in_path.join("add/Cargo.toml"), "[package]\n");
        std::os::unix::fs::symlink(&shared, options.in_path.join("add/shared")).unwrap();

        let report = compose(&options).unwrap();

        assert_eq!(report.written, 2);
        let copied = options.out_path.join("add/shared");
        assert!(!fs::symlink_metadata(&copied).unwrap().file_type().is_symlink());
        assert_eq!(
            fs::read_to_string(copied.join("helpers.rs")).unwrap(),
            "// TODO: your code here.\n"
        );
    }

    #[test]
    fn nested_entries_spare_their_top_level_directory() {
        let (_temp, options) = setup("entries:\n  - problems/add\n");
        write(&options.in_path.join("problems/add/Cargo.toml"), "[package]\n");
        write(&options.out_path.join("problems/sub/keep.txt"), "keep");

        let report = compose(&options).unwrap();

        assert!(report.pruned.is_empty());
        assert_eq!(report.members, vec!["problems/add"]);
        assert!(options.out_path.join("problems/add/Cargo.toml").exists());
    }
}
