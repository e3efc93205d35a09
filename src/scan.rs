//! Content directory scanning.
//!
//! The filesystem-facing half of the pipeline: turns a content directory into
//! concrete file lists and reads source files. Both delivery paths (dev server
//! and static build) discover files through here, so they agree on what
//! counts as content.
//!
//! ## Profiles
//!
//! | Profile | Matches | Excludes |
//! |---------|---------|----------|
//! | [`Profile::Documents`] | `**/*.md` | `**/*.draft.md` |
//! | [`Profile::Assets`] | `**/*` | `**/*.md` |
//!
//! Drafts fall out of both profiles: they are not documents, and as `.md` files
//! they are not assets either.
//!
//! ```text
//! docs/
//! ├── intro.md              # document
//! ├── roadmap.draft.md      # neither
//! ├── diagram.svg           # asset
//! ├── .cache/               # hidden, skipped
//! └── guide/
//!     ├── setup.md          # document
//!     └── screenshot.png    # asset
//! ```
//!
//! ## Paths
//!
//! Returned paths are absolute. The list comes back sorted by file name so logs
//! and reports are reproducible, but callers must not rely on any order;
//! directory indexes impose their own.

use crate::content::SourceFile;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Which files a scan collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Publishable markdown sources.
    Documents,
    /// Everything that is not markdown.
    Assets,
}

impl Profile {
    pub fn matches(self, file_name: &str) -> bool {
        match self {
            Profile::Documents => is_eligible(file_name),
            Profile::Assets => !file_name.ends_with(".md"),
        }
    }
}

/// A markdown file that is not a draft.
pub fn is_eligible(file_name: &str) -> bool {
    file_name.ends_with(".md") && !file_name.ends_with(".draft.md")
}

/// Recursively collect files under `root` matching `profile`.
pub fn scan(root: &Path, profile: Profile) -> Result<Vec<PathBuf>, ScanError> {
    walk(root, profile, None)
}

/// Collect matching files directly inside `dir`, without descending.
pub fn scan_dir(dir: &Path, profile: Profile) -> Result<Vec<PathBuf>, ScanError> {
    walk(dir, profile, Some(1))
}

/// Make `path` absolute against the working directory without touching the
/// filesystem.
pub fn absolute(path: &Path) -> Result<PathBuf, ScanError> {
    std::path::absolute(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn walk(root: &Path, profile: Profile, max_depth: Option<usize>) -> Result<Vec<PathBuf>, ScanError> {
    let root = absolute(root)?;
    if !root.is_dir() {
        return Err(ScanError::NotFound(root));
    }

    let mut walker = WalkDir::new(&root).follow_links(true).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    for entry in walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if profile.matches(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Read a markdown source file.
pub fn read_source(path: &Path) -> Result<SourceFile, ScanError> {
    let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    Ok(SourceFile::new(path, content))
}

/// Read a markdown source file on the async runtime.
pub async fn read_source_async(path: &Path) -> Result<SourceFile, ScanError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(path, e))?;
    Ok(SourceFile::new(path, content))
}

/// Read any content file as raw bytes.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, ScanError> {
    fs::read(path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: std::io::Error) -> ScanError {
    if source.kind() == std::io::ErrorKind::NotFound {
        ScanError::NotFound(path.to_path_buf())
    } else {
        ScanError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// `path` relative to `root`, with `/` separators.
///
/// Returns `None` if `path` is not under `root`.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
