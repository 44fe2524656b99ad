//! edugenius-core
//!
//! Turns a free-text learning request into a study guide: the LLM extracts
//! structured fields (with a keyword fallback), encyclopedia summaries ground
//! the topic, and a second LLM call writes the guide.
//!
//! The HTTP surface lives in the `edugenius-gateway` crate.

pub mod engine;
pub mod error;
pub mod fetcher;
pub mod knowledge;
pub mod llm;
pub mod parser;
pub mod synthesizer;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::StudyEngine;
pub use error::PipelineError;
pub use knowledge::{KnowledgeSource, WikiPage, WikipediaClient};
pub use llm::{ExternalLLM, GeminiClient, LLMCallInput, LLMCallOutput};
pub use types::{ParsedInfo, ReferenceContext, StudyGuide};
