//! Reference Fetcher
//!
//! Looks up the main topic and the leading keywords as exact page titles and
//! keeps the first few summaries that carry real content.

use tracing::{debug, error, info};

use crate::error::PipelineError;
use crate::knowledge::KnowledgeSource;
use crate::types::{ParsedInfo, ReferenceContext};

/// Stop collecting once this many contexts are accepted.
pub const MAX_CONTEXTS: usize = 2;
/// Keywords tried after the main topic.
pub const MAX_KEYWORD_TERMS: usize = 3;
/// Trimmed summaries must be strictly longer than this (in chars).
pub const MIN_SUMMARY_CHARS: usize = 100;
/// Longer summaries are cut to this many chars plus [`TRUNCATION_MARKER`].
pub const MAX_SUMMARY_CHARS: usize = 1500;
pub const TRUNCATION_MARKER: &str = "...";

/// `[main_topic]` followed by the first three keywords, in order.
pub fn search_terms(main_topic: &str, keywords: &[String]) -> Vec<String> {
    std::iter::once(main_topic.to_string())
        .chain(keywords.iter().take(MAX_KEYWORD_TERMS).cloned())
        .collect()
}

pub fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() > MAX_SUMMARY_CHARS {
        let mut cut: String = summary.chars().take(MAX_SUMMARY_CHARS).collect();
        cut.push_str(TRUNCATION_MARKER);
        cut
    } else {
        summary.to_string()
    }
}

pub async fn fetch_reference_context(
    source: &dyn KnowledgeSource,
    parsed_info: &ParsedInfo,
) -> Result<Vec<ReferenceContext>, PipelineError> {
    let terms = search_terms(&parsed_info.main_topic, &parsed_info.keywords);
    let mut contexts: Vec<ReferenceContext> = Vec::new();

    for term in &terms {
        if contexts.len() >= MAX_CONTEXTS {
            break;
        }

        let page = source.page(term).await.map_err(|e| {
            error!(term = %term, error = %e, "Knowledge source lookup failed");
            PipelineError::Fetch(e.to_string())
        })?;

        let Some(page) = page else {
            debug!(term = %term, "No page for search term");
            continue;
        };

        if page.summary.trim().chars().count() <= MIN_SUMMARY_CHARS {
            debug!(term = %term, title = %page.title, "Summary too short, skipping");
            continue;
        }

        // Topic and first keyword often resolve to the same page.
        if contexts.iter().any(|c| c.title == page.title) {
            debug!(term = %term, title = %page.title, "Page already collected, skipping");
            continue;
        }

        contexts.push(ReferenceContext {
            content: truncate_summary(&page.summary),
            title: page.title,
            url: page.url,
        });
    }

    if contexts.is_empty() {
        error!(terms = ?terms, "No usable reference pages");
        return Err(PipelineError::NoReferences);
    }

    info!(
        accepted = contexts.len(),
        titles = ?contexts.iter().map(|c| c.title.as_str()).collect::<Vec<_>>(),
        "Collected reference context"
    );

    Ok(contexts)
}
