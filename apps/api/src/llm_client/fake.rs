//! Scripted `TextGenerator` for tests: answers prompts by substring match.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GenerationOptions, LlmError, TextGenerator};

enum Reply {
    Text(String),
    Status(u16),
}

#[derive(Default)]
pub struct ScriptedGenerator {
    rules: Vec<(String, Reply)>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers any prompt containing `needle` with `response`.
    pub fn respond(mut self, needle: &str, response: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Text(response.to_string())));
        self
    }

    /// Fails any prompt containing `needle` as if the server returned `status`.
    pub fn fail(mut self, needle: &str, status: u16) -> Self {
        self.rules.push((needle.to_string(), Reply::Status(status)));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _options: GenerationOptions) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.rules.iter().find(|(needle, _)| prompt.contains(needle.as_str())) {
            Some((_, Reply::Text(text))) => Ok(text.clone()),
            Some((_, Reply::Status(status))) => Err(LlmError::Api {
                status: *status,
                message: "scripted failure".to_string(),
            }),
            None => Err(LlmError::Api {
                status: 500,
                message: "no scripted response for prompt".to_string(),
            }),
        }
    }
}
