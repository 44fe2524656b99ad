//! Subject Domain Classifier
//!
//! Keyword heuristic that turns a raw learning request into a [`ParsedInfo`]
//! without any external call. Used when the LLM answers in an unexpected shape.

use crate::types::ParsedInfo;

/// Phrases removed from the request when deriving the main topic.
const FILLER_PHRASES: [&str; 2] = ["teach me about", "learn about"];

/// Number of leading request tokens kept as search keywords.
const FALLBACK_KEYWORD_LIMIT: usize = 5;

/// Academic field inferred from trigger keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectDomain {
    ComputerScience,
    Biology,
    Physics,
    Chemistry,
    Mathematics,
    /// No trigger keyword matched.
    General,
}

impl SubjectDomain {
    /// Classified domains in match-priority order. `General` is not included.
    pub fn all() -> Vec<Self> {
        vec![
            Self::ComputerScience,
            Self::Biology,
            Self::Physics,
            Self::Chemistry,
            Self::Mathematics,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ComputerScience => "Computer Science",
            Self::Biology => "Biology",
            Self::Physics => "Physics",
            Self::Chemistry => "Chemistry",
            Self::Mathematics => "Mathematics",
            Self::General => "General",
        }
    }

    /// Substrings whose presence in the lower-cased request selects this domain.
    pub fn trigger_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::ComputerScience => &["programming", "algorithm", "data structure", "system", "software"],
            Self::Biology => &["cell", "organism", "dna", "protein", "evolution"],
            Self::Physics => &["quantum", "energy", "force", "particle", "wave"],
            Self::Chemistry => &["molecule", "atom", "reaction", "compound", "element"],
            Self::Mathematics => &["equation", "theorem", "calculus", "algebra", "geometry"],
            Self::General => &[],
        }
    }
}

/// First domain (in [`SubjectDomain::all`] order) with a matching trigger keyword.
pub fn classify_domain(text: &str) -> SubjectDomain {
    let text_lower = text.to_lowercase();
    SubjectDomain::all()
        .into_iter()
        .find(|domain| {
            domain
                .trigger_keywords()
                .iter()
                .any(|keyword| text_lower.contains(keyword))
        })
        .unwrap_or(SubjectDomain::General)
}

/// Strips filler phrases such as "teach me about" and trims the remainder.
/// Falls back to the trimmed request when nothing else is left.
pub fn derive_main_topic(text: &str) -> String {
    let mut topic = text.to_string();
    for phrase in FILLER_PHRASES {
        topic = topic.replace(phrase, "");
    }
    let topic = topic.trim();
    if topic.is_empty() {
        text.trim().to_string()
    } else {
        topic.to_string()
    }
}

/// Deterministic, side-effect-free substitute for LLM extraction.
pub fn fallback_parse(text: &str) -> ParsedInfo {
    let text_lower = text.to_lowercase();
    let domain = classify_domain(text);

    ParsedInfo {
        main_topic: derive_main_topic(text),
        subject_domain: domain.display_name().to_string(),
        specific_focus: text.to_string(),
        learning_intent: "comprehensive understanding".to_string(),
        complexity_level: "intermediate".to_string(),
        keywords: text_lower
            .split_whitespace()
            .take(FALLBACK_KEYWORD_LIMIT)
            .map(str::to_string)
            .collect(),
    }
}
