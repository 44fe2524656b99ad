use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::error::PipelineError;
use crate::fetcher::fetch_reference_context;
use crate::knowledge::KnowledgeSource;
use crate::llm::ExternalLLM;
use crate::parser::parse_learning_request;
use crate::synthesizer::generate_study_material;
use crate::types::StudyGuide;

/// The study-guide pipeline:
/// 1. Request parsing (ExternalLLM, keyword fallback)
/// 2. Reference retrieval (KnowledgeSource)
/// 3. Study material generation (ExternalLLM)
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct StudyEngine {
    llm: Arc<dyn ExternalLLM>,
    knowledge: Arc<dyn KnowledgeSource>,
}

// Manual Debug implementation since trait objects can't derive Debug
impl std::fmt::Debug for StudyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyEngine")
            .field("llm", &"Arc<dyn ExternalLLM>")
            .field("knowledge", &"Arc<dyn KnowledgeSource>")
            .finish()
    }
}

impl StudyEngine {
    pub fn new(llm: Arc<dyn ExternalLLM>, knowledge: Arc<dyn KnowledgeSource>) -> Self {
        Self { llm, knowledge }
    }

    /// Runs the stages strictly in sequence; the first failure ends the run.
    pub async fn generate(&self, user_prompt: &str) -> Result<StudyGuide, PipelineError> {
        let user_prompt = user_prompt.trim();
        if user_prompt.is_empty() {
            return Err(PipelineError::EmptyPrompt);
        }

        let started = Instant::now();
        tracing::info!(prompt = %user_prompt, "Generating study guide");

        // --- Step 1: Parse the learning request ---
        let parsed_info = parse_learning_request(self.llm.as_ref(), user_prompt).await?;

        // --- Step 2: Reference retrieval ---
        let contexts = fetch_reference_context(self.knowledge.as_ref(), &parsed_info).await?;

        // --- Step 3: Study material generation ---
        let study_material =
            generate_study_material(self.llm.as_ref(), &parsed_info, &contexts, user_prompt)
                .await?;

        tracing::info!(
            topic = %parsed_info.main_topic,
            sources = contexts.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Study guide complete"
        );

        Ok(StudyGuide {
            study_material,
            parsed_info,
            sources: contexts.into_iter().map(|ctx| ctx.title).collect(),
            generated_at: Utc::now(),
        })
    }
}
