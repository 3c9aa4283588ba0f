//! Chat Orchestrator for JGChat.
//!
//! Assembles the system prompt and messages array for one chat turn and
//! proxies it to the provider's messages endpoint. The orchestrator is
//! side-effect free: recording the question in the log is wired by the
//! caller, on success only.

use std::time::Duration;

use serde_json::{json, Value};

use crate::types::chat::ChatConfig;
use crate::types::errors::ChatError;

const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const TURN_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_TOKENS: u32 = 1024;

/// Trait defining chat orchestration operations.
pub trait ChatOrchestratorTrait {
    fn send_turn(
        &self,
        cfg: &ChatConfig,
        message: &str,
        history: &[Value],
    ) -> Result<String, ChatError>;
}

/// Chat orchestrator owning a bounded-timeout HTTP client.
pub struct ChatOrchestrator {
    client: reqwest::blocking::Client,
    api_base: String,
}

impl ChatOrchestrator {
    pub fn new() -> Result<Self, ChatError> {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Creates an orchestrator pointed at an alternate base URL.
    pub fn with_api_base(api_base: &str) -> Result<Self, ChatError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TURN_TIMEOUT)
            .build()
            .map_err(|e| ChatError::NetworkError(e.to_string()))?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

impl ChatOrchestratorTrait for ChatOrchestrator {
    /// Sends one chat turn to the provider and returns the assistant's text.
    ///
    /// Fails fast with `ChatError::NotConfigured` before any network call
    /// when no API key is set. A single attempt per turn; no retry.
    fn send_turn(
        &self,
        cfg: &ChatConfig,
        message: &str,
        history: &[Value],
    ) -> Result<String, ChatError> {
        if cfg.api_key.is_empty() {
            return Err(ChatError::NotConfigured);
        }

        let body = build_request_body(cfg, message, history);
        log::debug!("chat turn: model={} history_len={}", cfg.model, history.len());

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_base))
            .header("Content-Type", "application/json")
            .header("x-api-key", &cfg.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .map_err(|e| ChatError::NetworkError(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| ChatError::NetworkError(e.to_string()))?;

        log::debug!("chat turn: provider status={}", status);

        if status != 200 {
            return Err(ChatError::ApiError { status, body: text });
        }

        let parsed: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        Ok(extract_text(&parsed))
    }
}

/// Builds the system prompt from the configured name and knowledge base.
pub fn build_system_prompt(name: &str, knowledge_base: &str) -> String {
    format!(
        "You are {}, an AI assistant. Use this knowledge to help answer questions:\n\n{}",
        name, knowledge_base
    )
}

/// Builds the messages array: history role/content pairs passed through
/// unmodified (caller-supplied roles are trusted), then the new user message.
pub fn build_messages(history: &[Value], message: &str) -> Vec<Value> {
    let mut messages: Vec<Value> = history
        .iter()
        .map(|turn| {
            json!({
                "role": turn.get("role").cloned().unwrap_or(Value::Null),
                "content": turn.get("content").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();

    messages.push(json!({"role": "user", "content": message}));
    messages
}

/// Builds the full provider request body for one turn.
pub fn build_request_body(cfg: &ChatConfig, message: &str, history: &[Value]) -> Value {
    json!({
        "model": cfg.model,
        "messages": build_messages(history, message),
        "system": build_system_prompt(&cfg.name, &cfg.knowledge_base),
        "max_tokens": MAX_TOKENS,
    })
}

/// Extracts the first content block of type "text" from a provider response.
/// Returns an empty string when no text block is present (success, not error).
pub fn extract_text(body: &Value) -> String {
    if let Some(blocks) = body.get("content").and_then(|c| c.as_array()) {
        for block in blocks {
            if block.get("type").and_then(|t| t.as_str()) == Some("text") {
                return block
                    .get("text")
                    .and_then(|t| t.as_str())
                    .unwrap_or("")
                    .to_string();
            }
        }
    }
    String::new()
}
