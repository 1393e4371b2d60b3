//! Completion backend abstraction and the OpenAI-compatible HTTP client.
//!
//! The chunking core never inspects status codes or error strings; the
//! backend implementation classifies every failure into a typed kind
//! before it crosses this boundary.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::config::BackendConfig;

/// Typed completion failure. `RateLimited` is the only kind the caller
/// reacts to differently (longer cool-down before the next request).
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompletionError {
    #[error("rate limited by completion backend: {0}")]
    RateLimited(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unexpected backend response: {0}")]
    Unexpected(String),
}

impl CompletionError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, CompletionError::RateLimited(_))
    }
}

/// Text-generation capability (allows mocking). The caller picks the
/// system role per request stage.
pub trait CompletionBackend {
    fn complete(
        &self,
        system_prompt: &str,
        prompt: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionError>;
}

/// OpenAI-compatible chat-completions client (GitHub Models endpoint by
/// default, but any `/chat/completions` server works).
pub struct ChatCompletionsBackend {
    base_url: String,
    token: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl ChatCompletionsBackend {
    pub fn new(base_url: &str, token: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Build from configuration. Fails when no API token is configured —
    /// surfaced before any pipeline work starts, never mid-run.
    pub fn from_config(config: &BackendConfig) -> Result<Self, crate::config::ConfigError> {
        let token = config
            .token
            .as_deref()
            .ok_or(crate::config::ConfigError::MissingApiToken)?;
        Ok(Self::new(
            &config.endpoint,
            token,
            &config.model,
            config.timeout_secs,
        ))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl CompletionBackend for ChatCompletionsBackend {
    fn complete(
        &self,
        system_prompt: &str,
        prompt: &str,
        max_output_tokens: u32,
        temperature: f32,
    ) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: max_output_tokens,
            temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Transport(format!(
                        "request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    CompletionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let detail = response.text().unwrap_or_default();
            return Err(CompletionError::RateLimited(detail));
        }
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(CompletionError::Transport(format!(
                "HTTP {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| CompletionError::Unexpected(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Unexpected("no choices in response".into()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

/// Scripted backend for tests: pops one pre-programmed result per call
/// and records every prompt it receives.
pub struct MockCompletionBackend {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    prompts: Mutex<Vec<String>>,
    system_prompts: Mutex<Vec<String>>,
}

impl MockCompletionBackend {
    pub fn new(script: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
            system_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }

    pub fn system_prompts(&self) -> Vec<String> {
        self.system_prompts.lock().expect("system prompts lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().expect("prompts lock").len()
    }
}

impl CompletionBackend for MockCompletionBackend {
    fn complete(
        &self,
        system_prompt: &str,
        prompt: &str,
        _max_output_tokens: u32,
        _temperature: f32,
    ) -> Result<String, CompletionError> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());
        self.system_prompts
            .lock()
            .expect("system prompts lock")
            .push(system_prompt.to_string());
        match self.script.lock().expect("script lock").pop_front() {
            Some(result) => result,
            None => Ok(format!("mock summary ({} chars)", prompt.chars().count())),
        }
    }
}
