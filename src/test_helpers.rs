//! Shared test utilities for the mdjson test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let docs = content_root(&tmp);
//!
//! let tmp = TempDir::new().unwrap();
//! write_tree(tmp.path(), &[("docs/a.md", "# A"), ("docs/img/x.png", "png")]);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory name of the content tree inside `fixtures/`.
pub const FIXTURE_PREFIX: &str = "docs";

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

/// The content root inside a fixture copy.
pub fn content_root(tmp: &TempDir) -> PathBuf {
    tmp.path().join(FIXTURE_PREFIX)
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `(relative path, contents)` pairs under `root`, creating parents.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
    }
}

// =========================================================================
// Output tree inspection
// =========================================================================

/// Every file under `root` as a sorted list of `/`-separated relative paths.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| crate::scan::relative_path(root, e.path()).unwrap())
        .collect();
    files.sort();
    files
}

/// Parse a JSON file. Panics with the path on failure.
pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("bad JSON in {}: {e}", path.display()))
}

/// Ids of an index artifact, in file order.
pub fn index_ids(index: &serde_json::Value) -> Vec<String> {
    index
        .as_array()
        .unwrap_or_else(|| panic!("index is not an array: {index}"))
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}
