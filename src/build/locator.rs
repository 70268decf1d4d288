//! Build folder location and script discovery.
//!
//! Two matching rules coexist on purpose:
//! - A build is *runnable* when `<root>/<LABEL>/2.data_setup.sql` exists
//!   (fixed file name, folder directly under the root).
//! - *Discovery* walks the whole tree and picks up any file whose name ends
//!   with `data_setup.sql`, ordered by the ordinal found in its path.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::build::ordinal::{extract_build_label, extract_ordinal};
use crate::error::{Error, Result};
use crate::model::BuildVersion;

/// File name of a build's setup script.
pub const DATA_SETUP_NAME: &str = "2.data_setup.sql";

/// Suffix matched by recursive discovery.
pub const DATA_SETUP_SUFFIX: &str = "data_setup.sql";

/// A setup script found by discovery.
#[derive(Debug, Clone, Serialize)]
pub struct BuildScript {
    /// Absolute (or root-joined) path to the script.
    pub path: PathBuf,
    /// Ordinal extracted from the path relative to the root.
    pub ordinal: u64,
    /// Build the script belongs to (from the `B<n>` token in its path).
    pub version: BuildVersion,
}

/// Locates build folders and setup scripts under a root path.
///
/// Stateless apart from the root; every call hits the filesystem.
#[derive(Debug, Clone)]
pub struct BuildLocator {
    root: PathBuf,
}

impl BuildLocator {
    /// Create a locator rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The base path holding build folders.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder for a build (`<root>/<LABEL>`).
    #[must_use]
    pub fn build_dir(&self, version: &BuildVersion) -> PathBuf {
        self.root.join(version.folder_name())
    }

    /// Setup script path for a build (`<root>/<LABEL>/2.data_setup.sql`).
    #[must_use]
    pub fn script_path(&self, version: &BuildVersion) -> PathBuf {
        self.build_dir(version).join(DATA_SETUP_NAME)
    }

    /// Whether a build folder exists and carries its setup script.
    ///
    /// A missing folder and a folder without the script are both reported as
    /// `false`; they are logged at different levels so operators can tell
    /// "not shipped yet" from "shipped incomplete".
    #[must_use]
    pub fn is_runnable(&self, version: &BuildVersion) -> bool {
        let folder = self.build_dir(version);
        if !folder.is_dir() {
            warn!(build = %version.folder_name(), "Build is not available");
            return false;
        }

        if !folder.join(DATA_SETUP_NAME).exists() {
            error!(
                build = %version.folder_name(),
                script = DATA_SETUP_NAME,
                "Build folder exists but its setup script is missing"
            );
            return false;
        }

        true
    }

    /// Discover setup scripts whose ordinal is at least `from_ordinal`.
    ///
    /// The walk is drained and dropped before returning. Results are sorted
    /// ascending by ordinal with a stable sort; scripts sharing an ordinal keep
    /// the order the walk produced them in.
    ///
    /// # Errors
    ///
    /// Returns `Walk` if the tree cannot be traversed and `MalformedVersion`
    /// if a matching script's path has no ordinal or no `B<n>` token.
    pub fn discover_from(&self, from_ordinal: u64) -> Result<Vec<BuildScript>> {
        let mut scripts = Vec::new();

        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|source| Error::Walk {
                root: self.root.clone(),
                source,
            })?;

            if entry.file_type().is_dir()
                || !entry.file_name().to_string_lossy().ends_with(DATA_SETUP_SUFFIX)
            {
                continue;
            }

            // Digits in the root itself must not decide the order.
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or_else(|_| entry.path())
                .to_string_lossy()
                .into_owned();

            let ordinal = extract_ordinal(&relative)?;
            if ordinal < from_ordinal {
                debug!(script = %relative, ordinal, from_ordinal, "Skipping older script");
                continue;
            }

            let version = BuildVersion::parse(&extract_build_label(&relative)?)?;
            scripts.push(BuildScript {
                path: entry.into_path(),
                ordinal,
                version,
            });
        }

        scripts.sort_by_key(|script| script.ordinal);
        debug!(count = scripts.len(), from_ordinal, "Discovered setup scripts");
        Ok(scripts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn add_build(root: &Path, folder: &str, content: &str) {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DATA_SETUP_NAME), content).unwrap();
    }

    fn version(label: &str) -> BuildVersion {
        BuildVersion::parse(label).unwrap()
    }

    #[test]
    fn test_script_path_uses_uppercase_folder() {
        let locator = BuildLocator::new("/data");
        assert_eq!(
            locator.script_path(&version("b13")),
            PathBuf::from("/data/B13/2.data_setup.sql")
        );
    }

    #[test]
    fn test_is_runnable() {
        let temp = TempDir::new().unwrap();
        add_build(temp.path(), "B13", "SELECT 1;\n");
        let locator = BuildLocator::new(temp.path());

        assert!(locator.is_runnable(&version("B13")));
        assert!(locator.is_runnable(&version("b13")));
    }

    #[test]
    fn test_is_runnable_missing_folder() {
        let temp = TempDir::new().unwrap();
        let locator = BuildLocator::new(temp.path());
        assert!(!locator.is_runnable(&version("B14")));
    }

    #[test]
    fn test_is_runnable_missing_script() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("B14")).unwrap();
        fs::write(temp.path().join("B14").join("1.schema.sql"), "SELECT 1;").unwrap();
        let locator = BuildLocator::new(temp.path());

        assert!(!locator.is_runnable(&version("B14")));
    }

    #[test]
    fn test_discover_filters_and_orders_by_ordinal() {
        let temp = TempDir::new().unwrap();
        add_build(temp.path(), "B21", "SELECT 21;\n");
        add_build(temp.path(), "B9", "SELECT 9;\n");
        add_build(temp.path(), "B20", "SELECT 20;\n");
        let locator = BuildLocator::new(temp.path());

        let scripts = locator.discover_from(20).unwrap();
        let labels: Vec<_> = scripts.iter().map(|s| s.version.label().to_string()).collect();
        assert_eq!(labels, vec!["B20", "B21"]);
        assert_eq!(scripts[0].ordinal, 20);
    }

    #[test]
    fn test_discover_is_numeric_not_lexicographic() {
        let temp = TempDir::new().unwrap();
        add_build(temp.path(), "B100", "SELECT 100;\n");
        add_build(temp.path(), "B99", "SELECT 99;\n");
        let locator = BuildLocator::new(temp.path());

        let ordinals: Vec<_> = locator
            .discover_from(0)
            .unwrap()
            .iter()
            .map(|s| s.ordinal)
            .collect();
        assert_eq!(ordinals, vec![99, 100]);
    }

    #[test]
    fn test_discover_matches_suffix_recursively() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("B30").join("extra");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("3.data_setup.sql"), "SELECT 30;\n").unwrap();
        fs::write(nested.join("notes.sql"), "SELECT 0;\n").unwrap();
        let locator = BuildLocator::new(temp.path());

        let scripts = locator.discover_from(0).unwrap();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].version.label(), "B30");
        assert!(scripts[0].path.ends_with("B30/extra/3.data_setup.sql"));
    }

    #[test]
    fn test_discover_ignores_digits_in_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("release2024");
        add_build(&root, "B5", "SELECT 5;\n");
        let locator = BuildLocator::new(&root);

        let scripts = locator.discover_from(5).unwrap();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].ordinal, 5);
    }

    #[test]
    fn test_discover_empty_root() {
        let temp = TempDir::new().unwrap();
        let locator = BuildLocator::new(temp.path());
        assert!(locator.discover_from(0).unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_root_fails() {
        let locator = BuildLocator::new("/nonexistent/sqlsync/builds");
        assert!(matches!(locator.discover_from(0), Err(Error::Walk { .. })));
    }
}
