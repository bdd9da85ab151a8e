// src/ingest/extract.rs
use scraper::{Html, Selector};

use super::types::SourceFailure;

/// Apply a CSS selector to an HTML page and return the text of every match,
/// whitespace-collapsed and trimmed. Empty matches are dropped.
pub fn extract_fragments(html: &str, selector: &str) -> Result<Vec<String>, SourceFailure> {
    let sel = Selector::parse(selector).map_err(|e| SourceFailure::Selector {
        selector: selector.to_string(),
        detail: e.to_string(),
    })?;

    let document = Html::parse_document(html);
    let out = document
        .select(&sel)
        .map(|el| normalize_fragment(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect();
    Ok(out)
}

/// Collapse internal whitespace runs to one space and trim the ends.
pub fn normalize_fragment(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
