//! OpenAI API Provider
//!
//! LLM provider using OpenAI's Chat Completions API.
//! Returns LlmResponse with token usage metrics.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::{
    CompletionRequest, LlmProvider, LlmResponse, ProviderConfig, ResponseFormat, ResponseMetadata,
    ResponseTiming, TokenUsage,
};
use crate::constants::llm;
use crate::types::{LoomError, ProviderError, Result};

const PROVIDER_NAME: &str = "openai";

/// OpenAI API Provider with secure API key handling
pub struct OpenAiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                LoomError::Config(
                    "OpenAI API key not found. Set OPENAI_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let api_base = config
            .api_base
            .unwrap_or_else(|| llm::DEFAULT_API_BASE.to_string());

        let model = config
            .model
            .unwrap_or_else(|| llm::DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                LoomError::provider(PROVIDER_NAME, format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base,
            model,
            client,
        })
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        let response_format = match request.format {
            ResponseFormat::Json => Some(ApiResponseFormat {
                format_type: "json_object".to_string(),
            }),
            ResponseFormat::Text => None,
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system_message.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: Some(request.max_tokens),
            response_format,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse> {
        info!(
            "Completing with OpenAI (model: {}, format: {:?}, temperature: {})",
            self.model, request.format, request.temperature
        );

        let start_time = Instant::now();
        let body = self.build_request(request);
        let url = format!("{}/chat/completions", self.api_base);

        debug!("Sending request to OpenAI API");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                LoomError::provider(PROVIDER_NAME, format!("OpenAI request failed: {}", e))
            })?;

        let elapsed = start_time.elapsed();

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::http(PROVIDER_NAME, status, body).into());
        }

        let response_body: ChatCompletionResponse = response.json().await.map_err(|e| {
            LoomError::provider(PROVIDER_NAME, format!("Failed to parse OpenAI response: {}", e))
        })?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage::from_openai(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let text = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                LoomError::provider(PROVIDER_NAME, "No content in OpenAI response".to_string())
            })?;

        debug!("Received {} chars from OpenAI", text.len());

        Ok(LlmResponse::with_metrics(
            text,
            usage,
            ResponseTiming::from_duration(elapsed),
            ResponseMetadata {
                model: self.model.clone(),
                provider: PROVIDER_NAME.to_string(),
            },
        ))
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ApiResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ApiResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(ProviderConfig {
            model: Some("gpt-4o".to_string()),
            timeout_secs: 30,
            api_key: Some("sk-test".to_string()),
            api_base: None,
        })
        .unwrap()
    }

    #[test]
    fn test_json_contract_sets_response_format() {
        let request = provider().build_request(&CompletionRequest::json("plan queries"));
        let format = request.response_format.unwrap();
        assert_eq!(format.format_type, "json_object");
    }

    #[test]
    fn test_text_contract_omits_response_format() {
        let request = provider().build_request(&CompletionRequest::text("write prose"));
        assert!(request.response_format.is_none());
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", provider());
        assert!(!debug.contains("sk-test"));
        assert!(debug.contains("[REDACTED]"));
    }
}
