//! Request Parser
//!
//! Asks the LLM to turn a free-text learning request into a [`ParsedInfo`].
//! The fallback classifier covers "LLM answered, but not with usable JSON";
//! a failed LLM call is a hard error.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error, info, warn};

use crate::error::PipelineError;
use crate::knowledge::fallback_parse;
use crate::llm::{ExternalLLM, LLMCallInput};
use crate::types::ParsedInfo;

/// Greedy span from the first `{` to the last `}`.
static GREEDY_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

const PARSE_TEMPERATURE: f32 = 0.2;

pub fn build_parsing_prompt(user_prompt: &str) -> String {
    format!(
        r#"Analyze this learning request and extract key information in JSON format:

User Request: "{user_prompt}"

Extract the following information:
1. main_topic: The primary subject/topic to learn about
2. subject_domain: The broader academic field (e.g., Computer Science, Biology, History)
3. specific_focus: Any specific aspects or subtopics mentioned
4. learning_intent: What the user wants to achieve (learn, understand, master, etc.)
5. complexity_level: Inferred level (beginner, intermediate, advanced) based on language used
6. keywords: List of important terms for Wikipedia search

Return ONLY a valid JSON object with these fields. Do not include any other text.

Example output:
{{
    "main_topic": "System Calls",
    "subject_domain": "Computer Science - Operating Systems",
    "specific_focus": "System calls in operating systems",
    "learning_intent": "comprehensive understanding",
    "complexity_level": "intermediate",
    "keywords": ["system calls", "operating systems", "kernel", "user space"]
}}"#
    )
}

/// Every top-level brace-balanced `{...}` span, left to right.
/// Braces inside JSON string literals are ignored. A `{` that never closes
/// is treated as prose and the scan resumes just past it.
fn balanced_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut from = 0usize;

    loop {
        let mut depth = 0usize;
        let mut start = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, ch) in text[from..].char_indices() {
            let idx = from + offset;
            if depth > 0 && in_string {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    in_string = false;
                }
                continue;
            }

            match ch {
                '"' if depth > 0 => in_string = true,
                '{' => {
                    if depth == 0 {
                        start = idx;
                    }
                    depth += 1;
                }
                '}' if depth > 0 => {
                    depth -= 1;
                    if depth == 0 {
                        spans.push(&text[start..=idx]);
                    }
                }
                _ => {}
            }
        }

        if depth == 0 {
            break;
        }
        from = start + 1;
    }

    spans
}

/// Best-effort text-to-struct adapter for LLM output.
///
/// Tries the greedy first-`{`-to-last-`}` span first, then each balanced
/// object in order. Returns `None` when no candidate deserializes.
pub fn extract_parsed_info(text: &str) -> Option<ParsedInfo> {
    let greedy = GREEDY_OBJECT.find(text).map(|m| m.as_str());

    greedy
        .into_iter()
        .chain(balanced_objects(text))
        .find_map(|candidate| match serde_json::from_str::<ParsedInfo>(candidate) {
            Ok(info) => Some(info),
            Err(e) => {
                debug!(error = %e, candidate_length = candidate.len(), "JSON candidate rejected");
                None
            }
        })
}

/// Extracts structured fields from `user_prompt` via the LLM.
pub async fn parse_learning_request(
    llm: &dyn ExternalLLM,
    user_prompt: &str,
) -> Result<ParsedInfo, PipelineError> {
    let input = LLMCallInput {
        prompt: build_parsing_prompt(user_prompt),
        schema_name: "ParsedInfo".to_string(),
        temperature: PARSE_TEMPERATURE,
    };

    let output = llm.call(input).await.map_err(|e| {
        error!(error = %e, "Request parsing LLM call failed");
        PipelineError::Parse(e.to_string())
    })?;

    match extract_parsed_info(&output.raw_response) {
        Some(info) => {
            info!(
                main_topic = %info.main_topic,
                subject_domain = %info.subject_domain,
                keywords = info.keywords.len(),
                "Parsed learning request"
            );
            Ok(info)
        }
        None => {
            warn!(
                response_length = output.raw_response.len(),
                "No usable JSON in LLM response, using keyword fallback"
            );
            Ok(fallback_parse(user_prompt))
        }
    }
}
