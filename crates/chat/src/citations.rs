//! Citation marker extraction.
//!
//! The prompt instructs the model to tag knowledge-sourced claims with
//! `[ID:<token>]` markers. This module scans the raw completion text,
//! collects the tokens in order of first mention, strips every marker,
//! and assigns position-based display labels.
//!
//! Tokens are taken as-is: a marker whose token does not correspond to
//! any fetched record still yields a source entry. The store id is the
//! only authority on what a token means.

use std::sync::OnceLock;

use regex_lite::Regex;
use unihelp_core::message::SourceRef;

/// The outcome of scanning a completion for citation markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCitations {
    /// The text with every `[ID:...]` marker removed.
    pub text: String,

    /// One entry per distinct token, in order of first mention,
    /// labeled "Source #1", "Source #2", ...
    pub sources: Vec<SourceRef>,
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[ID:([^\]]+)\]").unwrap())
}

/// Scan `raw` for citation markers, strip them, and label the tokens.
///
/// De-duplication keeps the first mention; repeats of the same token do
/// not produce additional entries. Text without markers passes through
/// unchanged, so the scan is idempotent.
pub fn extract_citations(raw: &str) -> ExtractedCitations {
    let pattern = marker_pattern();

    let mut tokens: Vec<String> = Vec::new();
    for capture in pattern.captures_iter(raw) {
        let token = capture[1].to_string();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    let sources = tokens
        .into_iter()
        .enumerate()
        .map(|(i, record_id)| SourceRef {
            record_id,
            label: format!("Source #{}", i + 1),
        })
        .collect();

    ExtractedCitations {
        text: pattern.replace_all(raw, "").into_owned(),
        sources,
    }
}
