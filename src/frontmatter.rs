//! Front-matter extraction.
//!
//! A markdown file may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Intro
//! tags: [guide, setup]
//! ---
//! # Hello
//! ```
//!
//! [`split`] separates that block from the body without interpreting either;
//! [`parse_metadata`] turns the block into a JSON object. Keeping the two apart
//! lets the index path read metadata without ever rendering a body.
//!
//! ## Delimiter Rules
//!
//! - The very first line (after an optional BOM) must be exactly `---`,
//!   otherwise the file has no front matter and the whole text is the body.
//! - The block ends at the next line that is exactly `---`. The body starts on
//!   the line after it.
//! - An opening fence with no closing fence turns the rest of the file into the
//!   block, leaving an empty body.
//!
//! ## Metadata Shape
//!
//! The block must be a YAML mapping (or empty). Keys keep their source order in
//! the resulting [`Metadata`], so the emitted JSON reads like the file.

use serde_json::{Map, Value};
use thiserror::Error;

/// Metadata parsed from a front-matter block.
pub type Metadata = Map<String, Value>;

const DELIMITER: &str = "---";

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("front matter must be a mapping of keys to values")]
    NotAMapping,
    #[error("front matter keys must be strings: {0}")]
    Key(#[source] serde_json::Error),
}

/// A file's text cut into its metadata block and its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// Raw YAML between the fences, `None` when the file has no front matter.
    pub matter: Option<&'a str>,
    pub body: &'a str,
}

/// Cut `text` into front-matter block and body.
pub fn split(text: &str) -> Split<'_> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(rest) = strip_opening_fence(text) else {
        return Split {
            matter: None,
            body: text,
        };
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_fence(line) {
            return Split {
                matter: Some(&rest[..offset]),
                body: &rest[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    Split {
        matter: Some(rest),
        body: "",
    }
}

/// Parse a raw front-matter block into metadata.
///
/// Empty and comment-only blocks yield an empty mapping.
pub fn parse_metadata(matter: &str) -> Result<Metadata, FrontMatterError> {
    let blank = matter.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(Metadata::new());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(matter)?;
    match value {
        serde_yaml::Value::Null => Ok(Metadata::new()),
        serde_yaml::Value::Mapping(_) => {
            match serde_json::to_value(&value).map_err(FrontMatterError::Key)? {
                Value::Object(map) => Ok(map),
                _ => Err(FrontMatterError::NotAMapping),
            }
        }
        _ => Err(FrontMatterError::NotAMapping),
    }
}

/// Split `text` and parse its metadata in one step.
pub fn extract(text: &str) -> Result<(Metadata, &str), FrontMatterError> {
    let split = split(text);
    let metadata = match split.matter {
        Some(matter) => parse_metadata(matter)?,
        None => Metadata::new(),
    };
    Ok((metadata, split.body))
}

fn strip_opening_fence(text: &str) -> Option<&str> {
    let (first, rest) = match text.find('\n') {
        Some(i) => (&text[..=i], &text[i + 1..]),
        None => (text, ""),
    };
    is_fence(first).then_some(rest)
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r', ' ', '\t']) == DELIMITER
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn split_separates_block_and_body() {
        let s = split("---\ntitle: Intro\n---\n# Hello");
        assert_eq!(s.matter, Some("title: Intro\n"));
        assert_eq!(s.body, "# Hello");
    }

    #[test]
    fn split_without_front_matter_keeps_whole_text() {
        let s = split("# Hello\n\ntext");
        assert_eq!(s.matter, None);
        assert_eq!(s.body, "# Hello\n\ntext");
    }

    #[test]
    fn split_requires_exact_opening_fence() {
        let s = split("----\ntitle: x\n---\nbody");
        assert_eq!(s.matter, None);
    }

    #[test]
    fn split_allows_trailing_whitespace_on_fences() {
        let s = split("--- \ntitle: x\n---\t\nbody");
        assert_eq!(s.matter, Some("title: x\n"));
        assert_eq!(s.body, "body");
    }

    #[test]
    fn split_handles_crlf() {
        let s = split("---\r\ntitle: x\r\n---\r\nbody\r\n");
        assert_eq!(s.matter, Some("title: x\r\n"));
        assert_eq!(s.body, "body\r\n");
    }

    #[test]
    fn split_skips_bom() {
        let s = split("\u{feff}---\na: 1\n---\nbody");
        assert_eq!(s.matter, Some("a: 1\n"));
        assert_eq!(s.body, "body");
    }

    #[test]
    fn split_empty_block() {
        let s = split("---\n---\n# Hi");
        assert_eq!(s.matter, Some(""));
        assert_eq!(s.body, "# Hi");
    }

    #[test]
    fn split_unclosed_block_takes_rest() {
        let s = split("---\ntitle: x\nmore: y\n");
        assert_eq!(s.matter, Some("title: x\nmore: y\n"));
        assert_eq!(s.body, "");
    }

    #[test]
    fn later_fence_in_body_is_untouched() {
        let s = split("---\na: 1\n---\nintro\n---\nmore");
        assert_eq!(s.body, "intro\n---\nmore");
    }

    #[test]
    fn parse_scalars() {
        let meta = parse_metadata("title: Intro\ndraft: false\norder: 3\n").unwrap();
        assert_eq!(meta["title"], json!("Intro"));
        assert_eq!(meta["draft"], json!(false));
        assert_eq!(meta["order"], json!(3));
    }

    #[test]
    fn parse_keeps_source_key_order() {
        let meta = parse_metadata("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<&str> = meta.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn parse_nested_values() {
        let meta = parse_metadata("tags: [a, b]\nauthor:\n  name: Ada\n").unwrap();
        assert_eq!(meta["tags"], json!(["a", "b"]));
        assert_eq!(meta["author"], json!({"name": "Ada"}));
    }

    #[test]
    fn parse_empty_and_comment_only() {
        assert!(parse_metadata("").unwrap().is_empty());
        assert!(parse_metadata("  \n").unwrap().is_empty());
        assert!(parse_metadata("# just a comment\n").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_scalar_block() {
        let result = parse_metadata("just a string\n");
        assert!(matches!(result, Err(FrontMatterError::NotAMapping)));
    }

    #[test]
    fn parse_rejects_sequence_block() {
        let result = parse_metadata("- a\n- b\n");
        assert!(matches!(result, Err(FrontMatterError::NotAMapping)));
    }

    #[test]
    fn parse_rejects_invalid_yaml() {
        let result = parse_metadata("title: [unclosed\n");
        assert!(matches!(result, Err(FrontMatterError::Yaml(_))));
    }

    #[test]
    fn extract_returns_metadata_and_body() {
        let (meta, body) = extract("---\ntitle: X\n---\n# Hi").unwrap();
        assert_eq!(meta["title"], json!("X"));
        assert_eq!(body, "# Hi");
    }

    #[test]
    fn extract_without_block_is_empty_metadata() {
        let (meta, body) = extract("plain").unwrap();
        assert!(meta.is_empty());
        assert_eq!(body, "plain");
    }
}
