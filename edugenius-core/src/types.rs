use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_complexity_level() -> String {
    "intermediate".to_string()
}

// --- 1. Parsed Learning Request ---

/// Structured fields extracted from a free-text learning request.
///
/// Deserialization is lenient so that a partially filled object returned by
/// the LLM still yields a usable record; present values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedInfo {
    #[serde(default)]
    pub main_topic: String,
    #[serde(default)]
    pub subject_domain: String,
    #[serde(default)]
    pub specific_focus: String,
    #[serde(default)]
    pub learning_intent: String,
    /// One of `beginner`, `intermediate`, `advanced` when produced locally.
    #[serde(default = "default_complexity_level")]
    pub complexity_level: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

// --- 2. Reference Material ---

/// A single encyclopedia summary used to ground the generated guide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceContext {
    pub title: String,
    pub content: String,
    pub url: String,
}

// --- 3. Final Artifact ---

/// Everything a successful pipeline run hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct StudyGuide {
    pub study_material: String,
    pub parsed_info: ParsedInfo,
    /// Reference titles in discovery order.
    pub sources: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
