//! CourseLoom - AI-Driven Course Outline Generator
//!
//! Generates a structured academic course outline from free-text course
//! metadata by orchestrating a chain of LLM calls interleaved with a
//! scholarly search step, then renders the result into a downloadable
//! document.
//!
//! ## Pipeline
//!
//! Strictly sequential, each stage's output feeding the next:
//!
//! 1. **QueryPlanner**: decompose course metadata into (topic, query) pairs
//! 2. **ReferenceGatherer**: Google Scholar hits per topic, with
//!    credential failover and per-query degradation
//! 3. **OutcomeSynthesizer**: filter references, then generate CLOs/ILOs
//!    with citations under a two-tier taxonomy
//! 4. **OutlinePlanner**: narrative weekly schedule, then schema coercion
//!    into the validated outline contract
//! 5. **OutlineRenderer**: deterministic outline → document bytes
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use courseloom::{CoursePipeline, OpenAiProvider, OutlineRenderer, SerpApiClient};
//!
//! let provider = Arc::new(OpenAiProvider::new(provider_config)?);
//! let search = Arc::new(SerpApiClient::new(&config.search)?);
//! let pipeline = CoursePipeline::new(provider, search, 5);
//! let report = pipeline.run(&spec).await?;
//! let bytes = OutlineRenderer::new().render(&report.outline)?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: LLM provider abstraction and JSON response repair
//! - [`search`]: scholarly search with multi-key failover
//! - [`pipeline`]: the stage chain and its prompts
//! - [`render`]: outline to document bytes
//! - [`config`]: layered configuration
//! - [`runlog`]: append-only run records

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod pipeline;
pub mod render;
pub mod runlog;
pub mod search;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, LlmConfig, OutputConfig, SearchConfig};

// Error Types
pub use types::error::{Degradation, LoomError, ProviderError, Result, RunDiagnostics};

// Domain Types
pub use types::{
    Activity, CourseOutline, CourseSpec, OutcomeSet, Reference, SearchHit, Topic, TopicQuery,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{
    CoursePipeline, OutcomeSynthesizer, OutlinePlanner, QueryPlanner, ReferenceGatherer,
    ReferenceSet, RunReport,
};
pub use render::OutlineRenderer;
pub use runlog::{RunLog, RunRecord};

// =============================================================================
// Client Re-exports
// =============================================================================

pub use ai::{
    CompletionRequest, LlmProvider, LlmResponse, OpenAiProvider, ProviderConfig, ResponseFormat,
    SharedProvider,
};
pub use search::{ScholarSearch, SerpApiClient, SharedSearch};
