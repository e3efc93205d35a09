//! CLI output formatting for every command.
//!
//! # Artifact-First Display
//!
//! Output lists what a reader of the site will fetch: artifact names relative
//! to the output root, grouped by kind. Source paths are not repeated, since an
//! artifact name maps back to exactly one source (`docs/guide/setup.json` came
//! from `docs/guide/setup.md`).
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Documents
//!     001 docs/changelog.json
//!     002 docs/guide/setup.json
//!
//! Indexes
//!     001 docs/guide/index.json
//!     002 docs/index.json
//!
//! Assets
//!     001 docs/img/diagram.svg
//!
//! Built 2 documents, 2 indexes, 1 asset → dist
//! ```
//!
//! Assets that were not copied because a generated artifact took their name
//! get their own `Skipped` section.
//!
//! ## Check
//!
//! ```text
//! Checked 2 documents, 2 indexes
//! Content is valid
//! ```
//!
//! ## Serve
//!
//! ```text
//! Serving docs/ at http://127.0.0.1:5173/docs/
//!     Documents: /docs/<path>.json
//!     Indexes:   /docs/<dir>/index.json
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::materialize::MaterializeReport;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 asset`, `2 assets`.
fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// A titled, numbered list followed by a blank line. Empty lists print nothing.
fn section(lines: &mut Vec<String>, title: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    lines.push(title.to_string());
    for (i, name) in names.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(1), format_index(i + 1), name));
    }
    lines.push(String::new());
}

// ============================================================================
// Build
// ============================================================================

/// Format the result of a build into `output_dir`.
pub fn format_build_output(report: &MaterializeReport, output_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    section(&mut lines, "Documents", &report.documents);
    section(&mut lines, "Indexes", &report.indexes);
    section(&mut lines, "Assets", &report.assets);
    section(&mut lines, "Skipped (name taken by a generated artifact)", &report.skipped);

    lines.push(format!(
        "Built {}, {}, {} → {}",
        count(report.documents.len(), "document", "documents"),
        count(report.indexes.len(), "index", "indexes"),
        count(report.assets.len(), "asset", "assets"),
        output_dir.display()
    ));
    lines
}

pub fn print_build_output(report: &MaterializeReport, output_dir: &Path) {
    for line in format_build_output(report, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the result of a dry run. Only counts; nothing was written.
pub fn format_check_output(report: &MaterializeReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Checked {}, {}",
        count(report.documents.len(), "document", "documents"),
        count(report.indexes.len(), "index", "indexes")
    )];
    for name in &report.skipped {
        lines.push(format!("{}Asset would be skipped: {}", indent(1), name));
    }
    lines.push("Content is valid".to_string());
    lines
}

pub fn print_check_output(report: &MaterializeReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Serve
// ============================================================================

/// Format the dev server banner.
pub fn format_serve_banner(addr: &str, prefix: &str) -> Vec<String> {
    vec![
        format!("Serving {prefix}/ at http://{addr}/{prefix}/"),
        format!("{}Documents: /{prefix}/<path>.json", indent(1)),
        format!("{}Indexes:   /{prefix}/<dir>/index.json", indent(1)),
    ]
}

pub fn print_serve_banner(addr: &str, prefix: &str) {
    for line in format_serve_banner(addr, prefix) {
        println!("{}", line);
    }
}
