//! Test infrastructure shared by the workspace crates.
//!
//! Rendered interference patterns and fitted tables are easier to review as
//! files than as assertion output, so tests that produce them write into a
//! single `test_output/` directory at the workspace root:
//!
//! ```text
//! test_output/
//! ├── rings/            # Rendered interference fields
//! └── tables/           # Measurement tables written by integration tests
//! ```
//!
//! The workspace root is the nearest ancestor of this crate whose
//! `Cargo.toml` has a `[workspace]` section, so the same paths resolve
//! whether tests run from the root or from a member crate.
//!
//! # Example
//! ```rust
//! use test_helpers::{find_project_root, output_path};
//!
//! let root = find_project_root().unwrap();
//! assert!(root.join("interferometry").exists());
//!
//! let png = output_path("rings/sodium_100mm.png");
//! assert!(png.starts_with(root.join("test_output")));
//! ```

use once_cell::sync::Lazy;
use std::env;
use std::path::{Path, PathBuf};

/// Errors raised while locating test resources.
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    /// No ancestor of the current directory holds a workspace manifest.
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),
}

fn is_workspace_manifest(manifest: &Path) -> Result<bool, TestHelperError> {
    if !manifest.is_file() {
        return Ok(false);
    }
    let content = std::fs::read_to_string(manifest).map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to read {}: {e}", manifest.display()))
    })?;
    Ok(content.lines().any(|line| line.trim() == "[workspace]"))
}

/// Locate the workspace root.
///
/// Searches the ancestors of this crate's manifest directory, then those of
/// the current directory, for the first `Cargo.toml` declaring
/// `[workspace]`.
///
/// # Errors
/// Returns `TestHelperError::ProjectRootNotFound` when no ancestor holds a
/// workspace manifest, or when a manifest cannot be read.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {e}"))
    })?;

    for start in [manifest_dir, current_dir] {
        for dir in start.ancestors() {
            if is_workspace_manifest(&dir.join("Cargo.toml"))? {
                return Ok(dir.to_path_buf());
            }
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "no Cargo.toml with a [workspace] section above the crate".to_string(),
    ))
}

/// Workspace root, resolved once per test process.
static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// `<workspace>/test_output`, created on first use.
///
/// Panics if the directory cannot be created. Only test code calls this.
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }

    output_dir
}

/// Path of `path` inside the test output directory.
///
/// Parent directories of nested paths are created so the result can be
/// written to directly.
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let full = get_output_dir().join(path);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create output subdirectory");
    }
    full
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_root_is_workspace() {
        let root = find_project_root().expect("Failed to find project root");
        assert!(root.join("Cargo.toml").exists());
        assert!(root.join("fringe-math").exists());
        assert!(root.join("test_helpers").exists());
    }

    #[test]
    fn test_member_manifest_is_not_workspace() {
        let root = find_project_root().unwrap();
        assert!(is_workspace_manifest(&root.join("Cargo.toml")).unwrap());
        assert!(!is_workspace_manifest(&root.join("test_helpers/Cargo.toml")).unwrap());
        assert!(!is_workspace_manifest(&root.join("missing/Cargo.toml")).unwrap());
    }

    #[test]
    fn test_output_dir_created() {
        let output = get_output_dir();
        assert!(output.exists());
        assert!(output.is_dir());
    }

    #[test]
    fn test_output_path_creates_parents() {
        let path = output_path("rings/nested/check.png");
        assert_eq!(path, get_output_dir().join("rings/nested/check.png"));
        assert!(path.parent().is_some_and(|p| p.is_dir()));
    }
}
