//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Kinds
//!
//! - **Provider**: an external LLM or search call failed (HTTP status or
//!   API-level error). Search provider errors are converted to degradations
//!   at query granularity; LLM provider errors propagate and abort the run.
//! - **Schema**: a stage's JSON output failed to parse or failed
//!   required-field validation. Fatal at the outline-coercion stage.
//! - **Config**: invalid or missing configuration (fail fast).
//!
//! Degraded results are intentionally NOT errors: a [`Degradation`] records
//! a suppressed cause while the run continues, accumulated into per-run
//! [`RunDiagnostics`] surfaced to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Provider Error
// =============================================================================

/// Structured provider error with the failing provider and HTTP status
#[derive(Debug, Clone)]
pub struct ProviderError {
    /// Provider that produced the error ("openai", "serpapi", ...)
    pub provider: String,
    /// HTTP status code, if the failure happened at the HTTP layer
    pub status: Option<u16>,
    /// Detailed error message
    pub message: String,
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}:{}] {}", self.provider, status, self.message),
            None => write!(f, "[{}] {}", self.provider, self.message),
        }
    }
}

impl std::error::Error for ProviderError {}

impl ProviderError {
    pub fn new(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Create error from an HTTP status response
    pub fn http(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether the failure is an authentication/authorization rejection
    pub fn is_auth(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum LoomError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// External LLM/search call failed
    #[error("Provider error: {0}")]
    Provider(ProviderError),

    /// JSON output failed to parse or failed required-field validation
    #[error("Schema error in field '{field}': {message}")]
    Schema { field: String, message: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl From<ProviderError> for LoomError {
    fn from(err: ProviderError) -> Self {
        LoomError::Provider(err)
    }
}

pub type Result<T> = std::result::Result<T, LoomError>;

impl LoomError {
    /// Create a schema error naming the offending field
    pub fn schema(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a provider error without HTTP context
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider(ProviderError::new(provider, message))
    }
}

// =============================================================================
// Degradations
// =============================================================================

/// A non-fatal condition where a stage intentionally returned a reduced or
/// empty result to let the pipeline continue, with the suppressed cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Degradation {
    /// Pipeline stage that degraded ("query-planner", "reference-gatherer", ...)
    pub stage: String,
    /// What was skipped or reduced (query text, topic name, ...)
    pub subject: String,
    /// The suppressed cause
    pub cause: String,
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: skipped '{}': {}", self.stage, self.subject, self.cause)
    }
}

impl Degradation {
    pub fn new(
        stage: impl Into<String>,
        subject: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        Self {
            stage: stage.into(),
            subject: subject.into(),
            cause: cause.into(),
        }
    }
}

/// Per-run accumulator for degradations, surfaced to the caller even though
/// the run continues.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RunDiagnostics {
    pub degradations: Vec<Degradation>,
}

impl RunDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, degradation: Degradation) {
        tracing::warn!("{}", degradation);
        self.degradations.push(degradation);
    }

    pub fn extend(&mut self, other: RunDiagnostics) {
        self.degradations.extend(other.degradations);
    }

    pub fn is_clean(&self) -> bool {
        self.degradations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.degradations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degradations.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::http("serpapi", 401, "invalid key");
        assert_eq!(err.to_string(), "[serpapi:401] invalid key");
        assert!(err.is_auth());

        let err = ProviderError::new("openai", "connection refused");
        assert_eq!(err.to_string(), "[openai] connection refused");
        assert!(!err.is_auth());
    }

    #[test]
    fn test_schema_error_names_field() {
        let err = LoomError::schema("clos", "missing required field");
        assert!(err.to_string().contains("'clos'"));
    }

    #[test]
    fn test_diagnostics_accumulate() {
        let mut diagnostics = RunDiagnostics::new();
        assert!(diagnostics.is_clean());

        diagnostics.record(Degradation::new(
            "reference-gatherer",
            "database normalization textbook",
            "[serpapi:401] all credentials exhausted",
        ));
        assert_eq!(diagnostics.len(), 1);
        assert!(!diagnostics.is_clean());
    }

    #[test]
    fn test_diagnostics_round_trip_serde() {
        let mut diagnostics = RunDiagnostics::new();
        diagnostics.record(Degradation::new("query-planner", "Intro to Databases", "bad JSON"));

        let json = serde_json::to_string(&diagnostics).unwrap();
        let restored: RunDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.degradations[0].stage, "query-planner");
        assert_eq!(restored.degradations[0].cause, "bad JSON");
    }
}
