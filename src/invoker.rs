use std::sync::Arc;

use tracing::{error, info, warn};

use crate::llm::{ChatBackend, ChatMessage, FailureKind};
use crate::models::{FailureReason, GenerationResult};
use crate::prompt::SYSTEM_PROMPT;

/// Ordered list of models to try for one prompt. Never empty: every
/// constructor takes a first model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidates(Vec<String>);

impl ModelCandidates {
    pub fn single(model: impl Into<String>) -> Self {
        Self(vec![model.into()])
    }

    pub fn with_fallback(preferred: impl Into<String>, fallback: Option<String>) -> Self {
        let mut models = vec![preferred.into()];
        models.extend(fallback);
        Self(models)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

pub struct ModelInvoker {
    backend: Arc<dyn ChatBackend>,
    temperature: f32,
}

impl ModelInvoker {
    pub fn new(backend: Arc<dyn ChatBackend>, temperature: f32) -> Self {
        Self { backend, temperature }
    }

    /// Tries each candidate in order. Rate limits fall through to the next
    /// model; any other error ends the attempt immediately.
    pub async fn invoke(&self, prompt: &str, candidates: &ModelCandidates) -> Result<GenerationResult, FailureReason> {
        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let mut tried = Vec::new();

        for model in candidates.iter() {
            match self.backend.complete(model, &messages, self.temperature).await {
                Ok(content) => {
                    info!("✅ Generated with {}", model);
                    return Ok(GenerationResult { model_used: model.to_string(), content });
                }
                Err(e) if e.kind() == FailureKind::Soft => {
                    warn!("⚠️ {} is rate limited, falling back to next candidate: {}", model, e);
                    tried.push(model.to_string());
                }
                Err(e) => {
                    error!("❌ {} failed, not trying remaining candidates: {}", model, e);
                    return Err(FailureReason::ProviderError { model: model.to_string(), message: e.to_string() });
                }
            }
        }

        Err(FailureReason::Exhausted { tried })
    }
}
