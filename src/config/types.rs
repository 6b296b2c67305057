//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/courseloom/) and project (.courseloom/)
//! level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{llm, search};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Scholarly search settings
    pub search: SearchConfig,

    /// Document output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            search: SearchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `LoomError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(crate::types::LoomError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(crate::types::LoomError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.search.timeout_secs == 0 {
            return Err(crate::types::LoomError::Config(
                "Search timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.search.results_per_query == 0 {
            return Err(crate::types::LoomError::Config(
                "Search results_per_query must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type (only "openai"-compatible endpoints supported)
    pub provider: String,

    /// Model for the generation-heavy stages (outcomes, outline)
    pub model: String,

    /// API key. Never serialized back out for security.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for LLM generation (0.0 = deterministic)
    pub temperature: f32,

    /// Maximum tokens to generate per call
    pub max_tokens: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: llm::DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base: None,
            timeout_secs: llm::DEFAULT_TIMEOUT_SECS,
            temperature: llm::DEFAULT_TEMPERATURE,
            max_tokens: llm::DEFAULT_MAX_TOKENS,
        }
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

// =============================================================================
// Search Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Credentials tried in order on failure (multi-key failover).
    /// Never serialized back out for security.
    #[serde(skip_serializing)]
    pub api_keys: Vec<String>,

    /// Search API endpoint
    pub endpoint: String,

    /// Ranked hits requested per planned query
    pub results_per_query: usize,

    /// Two-letter result language code
    pub language: String,

    /// Oldest publication year to include
    pub year_floor: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            endpoint: search::DEFAULT_ENDPOINT.to_string(),
            results_per_query: search::DEFAULT_RESULTS_PER_QUERY,
            language: search::DEFAULT_LANGUAGE.to_string(),
            year_floor: search::DEFAULT_YEAR_FLOOR,
            timeout_secs: search::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_keys", &format!("[{} key(s) REDACTED]", self.api_keys.len()))
            .field("endpoint", &self.endpoint)
            .field("results_per_query", &self.results_per_query)
            .field("language", &self.language)
            .field("year_floor", &self.year_floor)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory where rendered outlines are written
    pub directory: PathBuf,

    /// Append-only JSON run log path
    pub log_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("course_outline_outputs"),
            log_file: PathBuf::from("output_logs.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_temperature_range_enforced() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_results_per_query_rejected() {
        let mut config = Config::default();
        config.search.results_per_query = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());
        config.search.api_keys = vec!["serp-secret".to_string()];
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("serp-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
