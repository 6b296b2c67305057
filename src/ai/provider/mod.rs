//! LLM Provider Abstraction
//!
//! Defines the LlmProvider trait for prompt completion.
//! All providers return `LlmResponse` with token usage metrics.
//!
//! Unlike the search layer, providers perform no automatic retry: a
//! transient provider error propagates immediately to the caller.

mod openai;

pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::constants::llm;
use crate::types::Result;

// =============================================================================
// Completion Request
// =============================================================================

/// Requested output contract for a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text
    #[default]
    Text,
    /// Provider-enforced JSON object output
    Json,
}

/// One prompt + formatting contract sent to a provider
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system_message: String,
    pub format: ResponseFormat,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Free-text completion with default tuning
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_message: llm::DEFAULT_SYSTEM_MESSAGE.to_string(),
            format: ResponseFormat::Text,
            max_tokens: llm::DEFAULT_MAX_TOKENS,
            temperature: llm::DEFAULT_TEMPERATURE,
        }
    }

    /// JSON-contract completion with default tuning
    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            format: ResponseFormat::Json,
            ..Self::text(prompt)
        }
    }

    pub fn with_system(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = system_message.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

// =============================================================================
// LLM Response with Usage Metrics
// =============================================================================

/// Complete LLM response including raw text and usage metrics
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Raw response text (free text, or a JSON document under the Json contract)
    pub text: String,
    /// Token usage metrics
    pub usage: TokenUsage,
    /// Response timing
    pub timing: ResponseTiming,
    /// Provider and model info
    pub metadata: ResponseMetadata,
}

impl LlmResponse {
    /// Create response with text only (usage unknown)
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
            timing: ResponseTiming::default(),
            metadata: ResponseMetadata::default(),
        }
    }

    /// Create full response with all metrics
    pub fn with_metrics(
        text: String,
        usage: TokenUsage,
        timing: ResponseTiming,
        metadata: ResponseMetadata,
    ) -> Self {
        Self {
            text,
            usage,
            timing,
            metadata,
        }
    }
}

/// Token usage metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Input tokens (prompt)
    pub input_tokens: u32,
    /// Output tokens (response)
    pub output_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Create from OpenAI-style usage response
    pub fn from_openai(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            input_tokens: prompt_tokens,
            output_tokens: completion_tokens,
        }
    }
}

/// Response timing metrics
#[derive(Debug, Clone, Default)]
pub struct ResponseTiming {
    /// Total response time in milliseconds (wall clock)
    pub total_ms: u64,
}

impl ResponseTiming {
    pub fn from_duration(duration: std::time::Duration) -> Self {
        Self {
            total_ms: duration.as_millis() as u64,
        }
    }
}

/// Response metadata
#[derive(Debug, Clone, Default)]
pub struct ResponseMetadata {
    /// Model used
    pub model: String,
    /// Provider name
    pub provider: String,
}

/// Shared LLM provider handle, constructed once per run and passed by
/// reference into each stage.
pub type SharedProvider = Arc<dyn LlmProvider + Send + Sync>;

// =============================================================================
// Provider Configuration
// =============================================================================

/// Configuration for LLM providers
///
/// Note: API keys are handled securely - they are never serialized to output
/// and are redacted in debug output. Each provider converts the key to
/// SecretString internally for runtime protection.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// API key. Never serialized to output for security.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL (for custom endpoints)
    #[serde(default)]
    pub api_base: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl From<&crate::config::LlmConfig> for ProviderConfig {
    fn from(config: &crate::config::LlmConfig) -> Self {
        Self {
            model: Some(config.model.clone()),
            timeout_secs: config.timeout_secs,
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
        }
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

/// A language-model backend capable of completing a prompt under a
/// text or JSON formatting contract.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the raw response text
    async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse>;

    /// Provider name for logging and error context
    fn name(&self) -> &str;

    /// Model identifier for run records
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = CompletionRequest::json("give me JSON")
            .with_system("you are a planner")
            .with_temperature(0.2);
        assert_eq!(request.format, ResponseFormat::Json);
        assert_eq!(request.system_message, "you are a planner");
        assert_eq!(request.temperature, 0.2);

        let request = CompletionRequest::text("prose please");
        assert_eq!(request.format, ResponseFormat::Text);
        assert_eq!(request.max_tokens, llm::DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::from_openai(100, 50);
        assert_eq!(usage.total(), 150);
    }
}
