//! AI Infrastructure
//!
//! LLM provider abstraction and response validation.

pub mod provider;
pub mod validation;

pub use provider::{
    CompletionRequest, LlmProvider, LlmResponse, OpenAiProvider, ProviderConfig, ResponseFormat,
    ResponseMetadata, ResponseTiming, SharedProvider, TokenUsage,
};
pub use validation::{JsonRepairer, extract_json_from_response};
