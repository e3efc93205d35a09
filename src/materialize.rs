//! Static build of a content tree.
//!
//! Materializes everything the dev server would answer on request, ahead of
//! time, in one pass:
//!
//! ```text
//! docs/                          dist/docs/
//! ├── intro.md          →        ├── intro.json
//! ├── changelog.md      →        ├── changelog.json
//! ├── roadmap.draft.md           ├── index.json          [intro, changelog]
//! ├── img/diagram.svg   →        ├── img/diagram.svg     (copied verbatim)
//! └── guide/                     └── guide/
//!     ├── setup.md      →            ├── setup.json
//!     └── usage.md      →            ├── usage.json
//!                                    └── index.json      [usage, setup]
//! ```
//!
//! ## Phases
//!
//! 1. **Documents**: every eligible file is read, transformed and emitted as
//!    `<prefix>/<path>.json`. Files are processed in parallel with rayon.
//! 2. **Indexes**: once all documents are out, one `index.json` is emitted per
//!    directory that directly holds eligible files (the root included).
//! 3. **Assets**: every non-markdown file is copied byte-for-byte.
//!
//! Any failure aborts the build. Artifacts already emitted are left in place;
//! a failed build's output is not to be trusted.
//!
//! ## Collisions
//!
//! A directory index always wins over a document named `index.md` in the same
//! directory, matching the dev server, which answers every `index.json` request
//! with the directory index. Likewise an asset is skipped when its path equals a
//! generated artifact (e.g. `intro.json` next to `intro.md`).
//!
//! ## Emission
//!
//! Artifacts go through an [`Emitter`], which receives `/`-separated names
//! relative to the output root. [`FsEmitter`] writes them to disk; emission only
//! ever adds or overwrites files, it never deletes.

use crate::content::{self, ContentError};
use crate::scan::{self, Profile, ScanError};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to emit {name}: {source}")]
    Emit {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for build artifacts.
pub trait Emitter: Send + Sync {
    /// Register an artifact under `name` (relative, `/`-separated).
    fn emit(&self, name: &str, bytes: &[u8]) -> std::io::Result<()>;
}

/// Writes artifacts below an output directory.
#[derive(Debug, Clone)]
pub struct FsEmitter {
    out_dir: PathBuf,
}

impl FsEmitter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

impl Emitter for FsEmitter {
    fn emit(&self, name: &str, bytes: &[u8]) -> std::io::Result<()> {
        let path = self.out_dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)
    }
}

/// Accepts and drops every artifact. Used to validate a tree without output.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardEmitter;

impl Emitter for DiscardEmitter {
    fn emit(&self, _name: &str, _bytes: &[u8]) -> std::io::Result<()> {
        Ok(())
    }
}

/// Names of everything a build emitted, each list sorted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    pub documents: Vec<String>,
    pub indexes: Vec<String>,
    pub assets: Vec<String>,
    /// Assets not copied because a generated artifact has the same name.
    pub skipped: Vec<String>,
}

/// Build the whole content tree at `content_root` into `emitter`.
///
/// Artifact names are prefixed with `prefix` (the content directory name), so
/// `docs/guide/setup.md` lands at `<prefix>/guide/setup.json`.
pub fn materialize(
    content_root: &Path,
    prefix: &str,
    emitter: &dyn Emitter,
) -> Result<MaterializeReport, MaterializeError> {
    let root = scan::absolute(content_root)?;

    let sources = scan::scan(&root, Profile::Documents)?;
    let relative: Vec<String> = sources
        .iter()
        .map(|path| relative_to(&root, path))
        .collect::<Result<_, _>>()?;
    tracing::debug!(count = sources.len(), root = %root.display(), "found documents");

    let mut documents = sources
        .par_iter()
        .zip(relative.par_iter())
        .map(|(path, rel)| -> Result<String, MaterializeError> {
            let document = content::transform(&scan::read_source(path)?)?;
            let name = artifact_name(prefix, &json_name(rel));
            emit(emitter, &name, content::to_json(&document)?.as_bytes())?;
            tracing::debug!(artifact = %name, "emitted document");
            Ok(name)
        })
        .collect::<Result<Vec<_>, _>>()?;
    documents.sort();

    let directories: BTreeSet<&str> = relative.iter().map(|rel| parent_dir(rel)).collect();

    let mut indexes = directories
        .par_iter()
        .map(|dir| -> Result<String, MaterializeError> {
            let dir_path = if dir.is_empty() {
                root.clone()
            } else {
                root.join(dir)
            };
            let files = scan::scan_dir(&dir_path, Profile::Documents)?
                .iter()
                .map(|path| scan::read_source(path))
                .collect::<Result<Vec<_>, _>>()?;
            let index = content::build_index(&files)?;
            let name = artifact_name(prefix, &join(dir, "index.json"));
            emit(emitter, &name, content::to_json(&index)?.as_bytes())?;
            tracing::debug!(artifact = %name, entries = index.len(), "emitted index");
            Ok(name)
        })
        .collect::<Result<Vec<_>, _>>()?;
    indexes.sort();

    let generated: HashSet<&str> = documents
        .iter()
        .chain(indexes.iter())
        .map(String::as_str)
        .collect();

    let assets = scan::scan(&root, Profile::Assets)?;
    let copied = assets
        .par_iter()
        .map(|path| -> Result<(String, bool), MaterializeError> {
            let name = artifact_name(prefix, &relative_to(&root, path)?);
            if generated.contains(name.as_str()) {
                tracing::warn!(artifact = %name, "asset shadowed by generated artifact, not copied");
                return Ok((name, false));
            }
            emit(emitter, &name, &scan::read_bytes(path)?)?;
            Ok((name, true))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (copied, skipped): (Vec<_>, Vec<_>) = copied.into_iter().partition(|(_, kept)| *kept);
    let mut assets: Vec<String> = copied.into_iter().map(|(name, _)| name).collect();
    let mut skipped: Vec<String> = skipped.into_iter().map(|(name, _)| name).collect();
    assets.sort();
    skipped.sort();

    tracing::info!(
        documents = documents.len(),
        indexes = indexes.len(),
        assets = assets.len(),
        "materialized content"
    );

    Ok(MaterializeReport {
        documents,
        indexes,
        assets,
        skipped,
    })
}

/// Transform every document and build every index without writing anything.
pub fn check(content_root: &Path, prefix: &str) -> Result<MaterializeReport, MaterializeError> {
    materialize(content_root, prefix, &DiscardEmitter)
}

fn emit(emitter: &dyn Emitter, name: &str, bytes: &[u8]) -> Result<(), MaterializeError> {
    emitter
        .emit(name, bytes)
        .map_err(|source| MaterializeError::Emit {
            name: name.to_string(),
            source,
        })
}

fn relative_to(root: &Path, path: &Path) -> Result<String, ScanError> {
    scan::relative_path(root, path).ok_or_else(|| ScanError::NotFound(path.to_path_buf()))
}

/// `guide/setup.md` → `guide/setup.json`.
fn json_name(rel: &str) -> String {
    format!("{}.json", rel.strip_suffix(".md").unwrap_or(rel))
}

/// Directory part of a relative path; `""` for files at the root.
fn parent_dir(rel: &str) -> &str {
    rel.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Output name of an artifact: `<prefix>/<rel>`.
pub fn artifact_name(prefix: &str, rel: &str) -> String {
    join(prefix.trim_matches('/'), rel)
}
