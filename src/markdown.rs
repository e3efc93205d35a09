//! Markdown body rendering.
//!
//! Bodies are rendered with [pulldown-cmark](https://docs.rs/pulldown-cmark)
//! using a single, process-wide option set: footnotes, tables, strikethrough
//! and task lists. Parser options are built once on first use and never change
//! afterwards, so two renders of the same text always produce the same HTML.
//!
//! ## Heading Ids
//!
//! Every heading gets a GitHub-style anchor id derived from its text:
//!
//! ```text
//! # Hello World!        → <h1 id="hello-world">
//! ## Hello World        → <h2 id="hello-world-1">   (repeat within a document)
//! ### API `v2` notes    → <h3 id="api-v2-notes">
//! ```
//!
//! Ids are unique per document only; the counter resets on every render.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use std::collections::HashMap;
use std::sync::LazyLock;
use unicode_properties::{GeneralCategory, GeneralCategoryGroup, UnicodeGeneralCategory};

static OPTIONS: LazyLock<Options> = LazyLock::new(|| {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
});

/// Render a markdown body to HTML.
pub fn render(body: &str) -> String {
    let mut events: Vec<Event<'_>> = Parser::new_ext(body, *OPTIONS).collect();
    let mut slugger = Slugger::default();

    for i in 0..events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }
        let slug = slugger.slug(&heading_text(&events[i + 1..]));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
    }

    let mut out = String::with_capacity(body.len() + body.len() / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Plain text of a heading, up to its closing tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// GitHub-compatible slug generator with per-document deduplication.
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, u32>,
}

impl Slugger {
    /// Slug `text`, appending `-N` if the slug was already handed out.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut candidate = base.clone();
        while self.seen.contains_key(&candidate) {
            let count = self.seen.entry(base.clone()).or_insert(0);
            *count += 1;
            candidate = format!("{base}-{count}");
        }
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}

/// Lowercase, drop everything but letters, marks, numbers, connector
/// punctuation, `-` and spaces, then turn spaces into dashes.
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter(|&c| c == '-' || c == ' ' || keeps(c))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

fn keeps(c: char) -> bool {
    match c.general_category_group() {
        GeneralCategoryGroup::Letter | GeneralCategoryGroup::Mark | GeneralCategoryGroup::Number => {
            true
        }
        _ => c.general_category() == GeneralCategory::ConnectorPunctuation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_gets_slug_id() {
        assert_eq!(render("# Hello"), "<h1 id=\"hello\">Hello</h1>\n");
    }

    #[test]
    fn heading_slug_drops_punctuation() {
        let html = render("## Hello, World!");
        assert!(html.contains("<h2 id=\"hello-world\">"), "{html}");
    }

    #[test]
    fn repeated_headings_are_numbered() {
        let html = render("# Setup\n\n## Setup\n\n## Setup\n");
        assert!(html.contains("id=\"setup\""));
        assert!(html.contains("id=\"setup-1\""));
        assert!(html.contains("id=\"setup-2\""));
    }

    #[test]
    fn inline_code_counts_toward_slug() {
        let html = render("### API `v2` notes");
        assert!(html.contains("id=\"api-v2-notes\""), "{html}");
    }

    #[test]
    fn slug_counter_resets_between_renders() {
        render("# Intro");
        assert_eq!(render("# Intro"), "<h1 id=\"intro\">Intro</h1>\n");
    }

    #[test]
    fn footnotes_enabled() {
        let html = render("Text[^1].\n\n[^1]: The note.\n");
        assert!(html.contains("footnote-reference"), "{html}");
        assert!(html.contains("footnote-definition"), "{html}");
    }

    #[test]
    fn tables_enabled() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"), "{html}");
    }

    #[test]
    fn strikethrough_enabled() {
        assert!(render("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn render_is_deterministic() {
        let md = "# A\n\nSome *text*[^n].\n\n## A\n\n[^n]: note\n";
        assert_eq!(render(md), render(md));
    }

    #[test]
    fn slugify_keeps_unicode_letters() {
        assert_eq!(slugify("Café Über"), "café-über");
    }

    #[test]
    fn slugify_keeps_combining_marks() {
        // decomposed: e + U+0301 COMBINING ACUTE ACCENT
        assert_eq!(slugify("Cafe\u{301} Menu"), "cafe\u{301}-menu");
        // spacing mark (Mc) in Devanagari
        assert_eq!(slugify("हिंदी"), "हिंदी");
    }

    #[test]
    fn slugify_keeps_underscores_and_dashes() {
        assert_eq!(slugify("snake_case and-dash"), "snake_case-and-dash");
    }

    #[test]
    fn slugger_suffix_does_not_collide_with_real_heading() {
        let mut s = Slugger::default();
        assert_eq!(s.slug("a"), "a");
        assert_eq!(s.slug("a-1"), "a-1");
        assert_eq!(s.slug("a"), "a-2");
    }
}
