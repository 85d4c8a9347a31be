use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

/// Placeholder credential that switches the service into offline demo mode.
pub const DEMO_KEY: &str = "DEMO_KEY";

/// How the invoker should react to a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Degrade to the next candidate model.
    Soft,
    /// Stop trying further candidates.
    Hard,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LlmError {
    #[error("rate limited: {0}")] RateLimited(String),
    #[error("API error (status {status}): {message}")] Api { status: u16, message: String },
    #[error("HTTP error: {0}")] Http(String),
    #[error("parse error: {0}")] Decode(String),
    #[error("response contained no completion")] EmptyCompletion,
}

impl LlmError {
    pub fn kind(&self) -> FailureKind {
        match self {
            LlmError::RateLimited(_) => FailureKind::Soft,
            _ => FailureKind::Hard,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }
}

/// A hosted chat-completion endpoint.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, model: &str, messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError>;
}

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        info!("🔗 Requesting completion from {} (model {})", url, model);

        let request_body = json!({
            "model": model,
            "messages": messages,
            "temperature": temperature,
        });

        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let response_text = response.text().await.map_err(|e| LlmError::Http(e.to_string()))?;

        if !status.is_success() {
            error!("❌ API error response from {}: {}", model, response_text);
            return Err(classify_error(status, &response_text));
        }

        let content = parse_completion(&response_text)?;
        info!("✅ Completion from {} ({} chars)", model, content.chars().count());
        Ok(content)
    }
}

/// Offline backend used when no API key is configured.
pub struct DemoBackend;

#[async_trait]
impl ChatBackend for DemoBackend {
    async fn complete(&self, model: &str, messages: &[ChatMessage], _temperature: f32) -> Result<String, LlmError> {
        info!("Using demo mode - generating placeholder copy");
        let instruction = messages
            .last()
            .and_then(|m| m.content.lines().last())
            .unwrap_or_default();
        Ok(format!(
            "Demo copy generated by {model}.\nConfigure OPENAI_API_KEY to receive real output.\n({instruction})"
        ))
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps a non-success response to an error; only 429 is treated as a rate limit.
pub fn classify_error(status: StatusCode, body: &str) -> LlmError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    if status == StatusCode::TOO_MANY_REQUESTS {
        LlmError::RateLimited(message)
    } else {
        LlmError::Api { status: status.as_u16(), message }
    }
}

fn parse_completion(body: &str) -> Result<String, LlmError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| LlmError::Decode(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(LlmError::EmptyCompletion)
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::{HashMap, VecDeque};

    /// Replays queued outcomes per model; unscripted calls succeed.
    #[derive(Default)]
    pub struct ScriptedBackend {
        script: Mutex<HashMap<String, VecDeque<Result<String, LlmError>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn push(&self, model: &str, outcome: Result<String, LlmError>) -> &Self {
            self.script.lock().entry(model.to_string()).or_default().push_back(outcome);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn complete(&self, model: &str, _messages: &[ChatMessage], _temperature: f32) -> Result<String, LlmError> {
            self.calls.lock().push(model.to_string());
            let next = self.script.lock().get_mut(model).and_then(|q| q.pop_front());
            next.unwrap_or_else(|| Ok(format!("copy from {model}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rate_limit_is_soft_everything_else_hard() {
        let body = r#"{"error":{"message":"Rate limit reached for gpt-4o","type":"requests"}}"#;
        let err = classify_error(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(err, LlmError::RateLimited("Rate limit reached for gpt-4o".into()));
        assert_eq!(err.kind(), FailureKind::Soft);

        let err = classify_error(StatusCode::UNAUTHORIZED, r#"{"error":{"message":"Incorrect API key"}}"#);
        assert_eq!(err, LlmError::Api { status: 401, message: "Incorrect API key".into() });
        assert_eq!(err.kind(), FailureKind::Hard);

        let err = classify_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err, LlmError::Api { status: 502, message: "upstream down".into() });
        assert_eq!(LlmError::Http("reset".into()).kind(), FailureKind::Hard);
    }

    #[test]
    fn reads_first_choice() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Hello"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Hello");
        assert_eq!(parse_completion(r#"{"choices":[]}"#), Err(LlmError::EmptyCompletion));
        assert!(matches!(parse_completion("not json"), Err(LlmError::Decode(_))));
    }

    #[test]
    fn messages_serialize_with_roles() {
        let v = serde_json::to_value([ChatMessage::system("s"), ChatMessage::user("u")]).unwrap();
        assert_eq!(v, json!([{"role": "system", "content": "s"}, {"role": "user", "content": "u"}]));
    }

    #[tokio::test]
    async fn demo_backend_never_fails() {
        let out = DemoBackend
            .complete("gpt-4o", &[ChatMessage::user("Write.\nRespond entirely in English.")], 0.7)
            .await
            .unwrap();
        assert!(out.contains("gpt-4o"));
        assert!(out.contains("Respond entirely in English."));
    }
}
