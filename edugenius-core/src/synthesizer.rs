//! Document Synthesizer
//!
//! Second LLM call: merges the parsed request and the reference summaries into
//! a nine-section study guide. The output is passed through unvalidated.

use tracing::{error, info};

use crate::error::PipelineError;
use crate::llm::{ExternalLLM, LLMCallInput};
use crate::types::{ParsedInfo, ReferenceContext};

const SYNTHESIS_TEMPERATURE: f32 = 0.7;

/// Sections the generated guide is asked to contain, in order.
pub const GUIDE_SECTIONS: [&str; 9] = [
    "📋 Overview",
    "🎯 Learning Objectives",
    "🔑 Key Concepts",
    "📖 Detailed Explanation",
    "💡 Practical Examples",
    "🔗 Key Relationships",
    "⚡ Quick Reference",
    "🧠 Self-Assessment Questions",
    "📚 Further Study",
];

const SECTION_HINTS: [&str; 9] = [
    "Brief introduction and why this topic is important",
    "What you'll understand after studying this material",
    "Core concepts with clear definitions",
    "In-depth explanation of the topic",
    "Real-world applications or examples",
    "How this topic connects to other concepts",
    "Important formulas, commands, or summary points",
    "3-5 questions to test understanding",
    "Suggestions for deeper learning",
];

/// Labels each context as `--- Source N: Title ---` followed by its content.
pub fn build_reference_block(contexts: &[ReferenceContext]) -> String {
    contexts
        .iter()
        .enumerate()
        .map(|(i, ctx)| format!("\n--- Source {}: {} ---\n{}\n", i + 1, ctx.title, ctx.content))
        .collect()
}

pub fn build_study_prompt(
    parsed_info: &ParsedInfo,
    contexts: &[ReferenceContext],
    original_prompt: &str,
) -> String {
    let outline: String = GUIDE_SECTIONS
        .iter()
        .zip(SECTION_HINTS.iter())
        .map(|(heading, hint)| format!("## {}\n[{}]\n\n", heading, hint))
        .collect();

    format!(
        r#"You are an expert educator and curriculum designer. Create comprehensive, well-structured study material based on the user's learning request.

**Original User Request:** "{original_prompt}"

**Parsed Learning Goals:**
- Topic: {topic}
- Domain: {domain}
- Focus: {focus}
- Level: {level}

**Factual Reference Material:**
{references}

**Your Task:**
Create a comprehensive study guide that is:
1. **Structured** - Use clear headings and logical flow
2. **Comprehensive** - Cover all important aspects
3. **Concise** - Be thorough but not overwhelming
4. **Effective** - Focus on key concepts that aid understanding
5. **Practical** - Include examples where relevant

**Required Structure:**

# {topic} - Complete Study Guide

{outline}Generate content that is pedagogically sound, engaging, and tailored to the {level} level.
Base your content on the provided reference material but expand with educational context as needed."#,
        topic = parsed_info.main_topic,
        domain = parsed_info.subject_domain,
        focus = parsed_info.specific_focus,
        level = parsed_info.complexity_level,
        references = build_reference_block(contexts),
    )
}

pub async fn generate_study_material(
    llm: &dyn ExternalLLM,
    parsed_info: &ParsedInfo,
    contexts: &[ReferenceContext],
    original_prompt: &str,
) -> Result<String, PipelineError> {
    let input = LLMCallInput {
        prompt: build_study_prompt(parsed_info, contexts, original_prompt),
        schema_name: "StudyMaterial".to_string(),
        temperature: SYNTHESIS_TEMPERATURE,
    };

    let output = llm.call(input).await.map_err(|e| {
        error!(error = %e, "Study material LLM call failed");
        PipelineError::Synthesis(e.to_string())
    })?;

    if output.raw_response.is_empty() {
        error!(topic = %parsed_info.main_topic, "LLM returned empty study material");
        return Err(PipelineError::EmptyGeneration);
    }

    info!(
        topic = %parsed_info.main_topic,
        sources = contexts.len(),
        material_length = output.raw_response.len(),
        "Generated study material"
    );

    Ok(output.raw_response)
}
