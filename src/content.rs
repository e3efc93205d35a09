//! Markdown source → JSON content.
//!
//! The two pure functions every delivery path shares:
//!
//! - [`transform`] turns one [`SourceFile`] into a [`TransformedDocument`]
//!   (id, metadata, rendered HTML).
//! - [`build_index`] turns the files of one directory into a [`DirectoryIndex`]
//!   (id and metadata only, no rendering).
//!
//! [`to_json`] is the single serializer for both artifact kinds. The dev server
//! and the static build both go through it, which is what keeps their output
//! byte-identical.
//!
//! ## Document JSON
//!
//! ```json
//! {
//!   "id": "intro",
//!   "data": {
//!     "title": "Intro"
//!   },
//!   "content": "<h1 id=\"hello\">Hello</h1>\n"
//! }
//! ```
//!
//! ## Index JSON
//!
//! Entries are sorted by `id` in **descending** order. Dated file names such as
//! `2024-05-01-release.md` therefore list newest first.
//!
//! ```json
//! [
//!   { "id": "b", "data": {} },
//!   { "id": "a", "data": {} }
//! ]
//! ```

use crate::frontmatter::{self, FrontMatterError, Metadata};
use crate::markdown;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Malformed front matter in {path}: {source}")]
    MalformedFrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

/// A markdown file's name and text, as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub filename: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn new(filename: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// A fully rendered document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformedDocument {
    pub id: String,
    pub data: Metadata,
    /// Rendered HTML body.
    pub content: String,
}

/// One row of a directory index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    pub id: String,
    pub data: Metadata,
}

/// Index entries sorted by id, descending.
pub type DirectoryIndex = Vec<IndexEntry>;

/// Derive a document id: file name without directory and without `.md`.
///
/// ```
/// use mdjson::content::document_id;
/// use std::path::Path;
///
/// assert_eq!(document_id(Path::new("/site/docs/guide/intro.md")), "intro");
/// ```
pub fn document_id(filename: &Path) -> String {
    let name = filename
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    name.strip_suffix(".md").unwrap_or(&*name).to_string()
}

/// Render one source file into a document.
pub fn transform(file: &SourceFile) -> Result<TransformedDocument, ContentError> {
    let (data, body) = frontmatter::extract(&file.content).map_err(|source| {
        ContentError::MalformedFrontMatter {
            path: file.filename.clone(),
            source,
        }
    })?;

    Ok(TransformedDocument {
        id: document_id(&file.filename),
        data,
        content: markdown::render(body),
    })
}

/// Read only the metadata of one source file.
pub fn index_entry(file: &SourceFile) -> Result<IndexEntry, ContentError> {
    let (data, _body) = frontmatter::extract(&file.content).map_err(|source| {
        ContentError::MalformedFrontMatter {
            path: file.filename.clone(),
            source,
        }
    })?;

    Ok(IndexEntry {
        id: document_id(&file.filename),
        data,
    })
}

/// Build the index of a set of files.
///
/// Sorting is stable: entries with equal ids keep their input order.
pub fn build_index(files: &[SourceFile]) -> Result<DirectoryIndex, ContentError> {
    let mut entries = files
        .iter()
        .map(index_entry)
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by(|a, b| b.id.cmp(&a.id));
    Ok(entries)
}

/// Serialize an artifact the way both delivery paths emit it:
/// pretty-printed with two-space indentation.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file(name: &str, text: &str) -> SourceFile {
        SourceFile::new(name, text)
    }

    #[test]
    fn id_strips_directory_and_extension() {
        assert_eq!(document_id(Path::new("docs/guide/setup.md")), "setup");
        assert_eq!(document_id(Path::new("intro.md")), "intro");
    }

    #[test]
    fn id_only_strips_trailing_md() {
        assert_eq!(document_id(Path::new("v1.2.md")), "v1.2");
        assert_eq!(document_id(Path::new("notes.markdown")), "notes.markdown");
    }

    #[test]
    fn transform_intro_scenario() {
        let doc = transform(&file("docs/intro.md", "---\ntitle: Intro\n---\n# Hello")).unwrap();
        assert_eq!(doc.id, "intro");
        assert_eq!(doc.data["title"], json!("Intro"));
        assert_eq!(doc.content, "<h1 id=\"hello\">Hello</h1>\n");
    }

    #[test]
    fn transform_title_property() {
        let doc = transform(&file("/abs/path/page.md", "---\ntitle: \"X\"\n---\n# Hi")).unwrap();
        assert_eq!(doc.id, "page");
        assert_eq!(doc.data["title"], json!("X"));
    }

    #[test]
    fn transform_without_front_matter() {
        let doc = transform(&file("plain.md", "Just text.")).unwrap();
        assert!(doc.data.is_empty());
        assert_eq!(doc.content, "<p>Just text.</p>\n");
    }

    #[test]
    fn transform_propagates_malformed_front_matter() {
        let result = transform(&file("bad.md", "---\n- not\n- a map\n---\nbody"));
        match result {
            Err(ContentError::MalformedFrontMatter { path, .. }) => {
                assert_eq!(path, PathBuf::from("bad.md"));
            }
            other => panic!("expected malformed front matter, got {other:?}"),
        }
    }

    #[test]
    fn document_json_shape() {
        let doc = transform(&file("intro.md", "---\ntitle: Intro\n---\n# Hello")).unwrap();
        let json = to_json(&doc).unwrap();
        assert_eq!(
            json,
            "{\n  \"id\": \"intro\",\n  \"data\": {\n    \"title\": \"Intro\"\n  },\n  \"content\": \"<h1 id=\\\"hello\\\">Hello</h1>\\n\"\n}"
        );
    }

    #[test]
    fn index_sorted_descending() {
        let index = build_index(&[file("a.md", "---\n---\n"), file("b.md", "---\n---\n")]).unwrap();
        let ids: Vec<&str> = index.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(index.iter().all(|e| e.data.is_empty()));
    }

    #[test]
    fn index_json_for_empty_front_matter() {
        let index = build_index(&[file("b.md", "---\n---\n"), file("a.md", "---\n---\n")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&to_json(&index).unwrap()).unwrap();
        assert_eq!(
            value,
            json!([{"id": "b", "data": {}}, {"id": "a", "data": {}}])
        );
    }

    #[test]
    fn index_sort_is_stable_for_equal_ids() {
        let index = build_index(&[
            file("x/same.md", "---\norder: 1\n---\n"),
            file("y/same.md", "---\norder: 2\n---\n"),
            file("z/other.md", ""),
            file("w/same.md", "---\norder: 3\n---\n"),
        ])
        .unwrap();
        let orders: Vec<_> = index
            .iter()
            .filter(|e| e.id == "same")
            .map(|e| e.data["order"].clone())
            .collect();
        assert_eq!(orders, vec![json!(1), json!(2), json!(3)]);
        assert_eq!(index[0].id, "same");
        assert_eq!(index[3].id, "other");
    }

    #[test]
    fn index_does_not_render_bodies() {
        // Body is irrelevant for the index; only metadata is kept.
        let index = build_index(&[file("a.md", "---\ntitle: A\n---\n# Heading")]).unwrap();
        let json = to_json(&index).unwrap();
        assert!(!json.contains("content"));
        assert!(!json.contains("<h1"));
    }

    #[test]
    fn index_propagates_malformed_front_matter() {
        let result = build_index(&[file("ok.md", ""), file("bad.md", "---\ntitle: [unclosed\n---\n")]);
        assert!(matches!(
            result,
            Err(ContentError::MalformedFrontMatter { .. })
        ));
    }

    #[test]
    fn index_of_no_files_is_empty_array() {
        let index = build_index(&[]).unwrap();
        assert_eq!(to_json(&index).unwrap(), "[]");
    }

    #[test]
    fn index_metadata_matches_document_metadata() {
        let f = file("doc.md", "---\ntitle: T\ntags: [a]\n---\nbody");
        let doc = transform(&f).unwrap();
        let entry = index_entry(&f).unwrap();
        assert_eq!(doc.id, entry.id);
        assert_eq!(doc.data, entry.data);
    }
}
