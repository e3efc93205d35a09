//! # mdjson
//!
//! A markdown documentation pipeline for web front-ends. A directory tree of
//! markdown files becomes JSON: one document per file (front matter + rendered
//! HTML) and one index per directory (front matter of every file in it).
//!
//! # Architecture: One Pipeline, Two Deliveries
//!
//! The same pure functions feed two delivery paths:
//!
//! ```text
//!                    ┌──────────────┐
//!   docs/**/*.md ──► │   content    │ ──► serve        JSON on request
//!                    │ (transform,  │
//!                    │  build_index,│ ──► materialize  JSON files in dist/
//!                    │  to_json)    │
//!                    └──────────────┘
//! ```
//!
//! For the same source tree, `GET /docs/guide/setup.json` on the dev server
//! and `dist/docs/guide/setup.json` from the build are byte-identical. This
//! holds by construction: neither adapter formats JSON itself, both call
//! [`content::to_json`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | Splits the `---` YAML block from the body and parses it to a JSON map |
//! | [`markdown`] | pulldown-cmark renderer with GitHub-style heading ids and footnotes |
//! | [`content`] | Pure transforms: source file → document, source files → directory index |
//! | [`scan`] | Walks the content tree (documents / assets), reads sources |
//! | [`serve`] | Dev server: axum middleware in front of a static file service |
//! | [`materialize`] | Static build: emits every document, index and asset ahead of time |
//! | [`config`] | `config.toml` loading, validation, and merging |
//! | [`logger`] | `tracing` subscriber setup |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Drafts
//!
//! Files named `*.draft.md` are never rendered: no JSON, not listed
//! in indexes, not built, not copied. Delete the `.draft` to publish.
//!
//! ## Index Order
//!
//! Indexes are sorted by id, descending. Date-prefixed names
//! (`2024-05-01-release.md`) therefore list newest first without any
//! front-matter convention. Ties keep scan order.
//!
//! ## Indexes Are Shallow
//!
//! A directory index lists only the files directly inside it. Nested
//! directories get their own index; a front-end that wants a tree fetches one
//! index per level.
//!
//! ## No Cache
//!
//! The dev server reads and renders on every request. Markdown rendering is
//! fast enough that a cache would only add invalidation bugs.

pub mod config;
pub mod content;
pub mod frontmatter;
pub mod logger;
pub mod markdown;
pub mod materialize;
pub mod output;
pub mod scan;
pub mod serve;

#[cfg(test)]
pub(crate) mod test_helpers;
