//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// LLM provider constants
pub mod llm {
    /// Default OpenAI-compatible API base
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

    /// Default model for generation-heavy stages
    pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

    /// Default maximum tokens to generate per call
    pub const DEFAULT_MAX_TOKENS: usize = 4000;

    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.5;

    /// Default per-request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Default system message for unscoped calls
    pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant.";
}

/// Scholarly search constants
pub mod search {
    /// SerpAPI Google Scholar endpoint
    pub const DEFAULT_ENDPOINT: &str = "https://serpapi.com/search";

    /// Ranked hits requested per planned query
    pub const DEFAULT_RESULTS_PER_QUERY: usize = 5;

    /// Two-letter result language code
    pub const DEFAULT_LANGUAGE: &str = "en";

    /// Oldest publication year to include; older sources are usually
    /// stale as course references
    pub const DEFAULT_YEAR_FLOOR: u32 = 2020;

    /// Default per-request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}

/// Pipeline tuning constants
pub mod pipeline {
    /// Word cap instructed for drafted course descriptions
    pub const DESCRIPTION_WORD_LIMIT: usize = 100;

    /// JSON repair attempts before giving up on a malformed response
    pub const MAX_JSON_REPAIR_ATTEMPTS: usize = 3;
}
