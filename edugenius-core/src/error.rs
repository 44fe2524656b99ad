//! Error types for the study-guide pipeline.
//!
//! Each variant's `Display` output is the message surfaced to the HTTP caller,
//! so the wording here is part of the external contract.

/// Terminal failure of a single pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Please provide a learning prompt")]
    EmptyPrompt,

    #[error("Error parsing request: {0}")]
    Parse(String),

    #[error("No relevant Wikipedia content found")]
    NoReferences,

    #[error("Error fetching Wikipedia data: {0}")]
    Fetch(String),

    #[error("Failed to generate study material")]
    EmptyGeneration,

    #[error("Error generating study material: {0}")]
    Synthesis(String),
}

impl PipelineError {
    /// Short machine-readable stage label, used as a tracing field.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::EmptyPrompt => "validation",
            Self::Parse(_) => "parse",
            Self::NoReferences | Self::Fetch(_) => "fetch",
            Self::EmptyGeneration | Self::Synthesis(_) => "synthesis",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_envelope_wording() {
        assert_eq!(
            PipelineError::EmptyPrompt.to_string(),
            "Please provide a learning prompt"
        );
        assert_eq!(
            PipelineError::Parse("timeout".to_string()).to_string(),
            "Error parsing request: timeout"
        );
        assert_eq!(
            PipelineError::NoReferences.to_string(),
            "No relevant Wikipedia content found"
        );
        assert_eq!(
            PipelineError::EmptyGeneration.to_string(),
            "Failed to generate study material"
        );
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(PipelineError::Fetch("x".into()).stage(), "fetch");
        assert_eq!(PipelineError::Synthesis("x".into()).stage(), "synthesis");
    }
}
