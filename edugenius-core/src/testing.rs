//! In-memory stand-ins for the external services.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::knowledge::{KnowledgeSource, WikiPage};
use crate::llm::{ExternalLLM, LLMCallInput, LLMCallOutput};

/// Text of exactly `chars` characters.
pub fn long_text(chars: usize) -> String {
    "abcdefghij".chars().cycle().take(chars).collect()
}

/// Replays canned responses in order and records every prompt it receives.
#[derive(Debug, Default)]
pub struct ScriptedLLM {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLLM {
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExternalLLM for ScriptedLLM {
    async fn call(&self, input: LLMCallInput) -> Result<LLMCallOutput> {
        self.prompts.lock().unwrap().push(input.prompt);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(raw_response)) => Ok(LLMCallOutput { raw_response }),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("script exhausted")),
        }
    }
}

/// Page store keyed by title. Lookups ignore case and return the stored
/// title, the way the encyclopedia resolves `mitosis` to `Mitosis`.
#[derive(Debug, Default)]
pub struct MemoryKnowledgeSource {
    pages: HashMap<String, WikiPage>,
    failure: Option<String>,
    lookups: Mutex<Vec<String>>,
}

impl MemoryKnowledgeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, title: &str, summary: &str) -> Self {
        self.pages.insert(
            title.to_lowercase(),
            WikiPage {
                title: title.to_string(),
                summary: summary.to_string(),
                url: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
            },
        );
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl KnowledgeSource for MemoryKnowledgeSource {
    async fn page(&self, title: &str) -> Result<Option<WikiPage>> {
        self.lookups.lock().unwrap().push(title.to_string());
        if let Some(message) = &self.failure {
            return Err(anyhow!(message.clone()));
        }
        Ok(self.pages.get(&title.to_lowercase()).cloned())
    }
}
