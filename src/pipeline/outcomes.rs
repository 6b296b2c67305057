//! Outcome Synthesizer
//!
//! Third pipeline stage: two sequential LLM text calls.
//!
//! 1. Filtering pass: discards stale or off-topic references from the raw
//!    aggregated search text. Recency and topical fit are model-driven, not
//!    programmatic. This pass exists to bound prompt size and suppress
//!    hallucinated citations by restricting the generation pass to a
//!    pre-vetted source list.
//! 2. Generation pass: course-level and per-topic outcomes with citations,
//!    honoring the two-tier taxonomy constraint.
//!
//! Provider errors propagate and abort the run: there is no safe degraded
//! form of the outcome set.

use tracing::{debug, info};

use super::prompts::{build_filter_prompt, build_outcomes_prompt};
use crate::ai::{CompletionRequest, SharedProvider};
use crate::types::{CourseSpec, OutcomeSet, Result};

const SYSTEM_MESSAGE: &str = "You are a curricular development expert.";

pub struct OutcomeSynthesizer {
    provider: SharedProvider,
}

impl OutcomeSynthesizer {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    /// Produce the outcome set as opaque structured text. Consumed verbatim
    /// by the outline planner; deliberately not parsed here.
    pub async fn synthesize(&self, spec: &CourseSpec, references_text: &str) -> Result<OutcomeSet> {
        let filtered = self.filter_references(spec, references_text).await?;
        debug!("Filtered references: {} chars", filtered.len());

        let request = CompletionRequest::text(build_outcomes_prompt(spec, &filtered))
            .with_system(SYSTEM_MESSAGE);
        let response = self.provider.complete(&request).await?;

        info!("Synthesized learning outcomes ({} chars)", response.text.len());
        Ok(OutcomeSet(response.text))
    }

    async fn filter_references(&self, spec: &CourseSpec, references_text: &str) -> Result<String> {
        let request = CompletionRequest::text(build_filter_prompt(spec, references_text))
            .with_system(SYSTEM_MESSAGE);
        let response = self.provider.complete(&request).await?;
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{StubProvider, sample_spec};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_two_pass_protocol() {
        let provider = StubProvider::with_responses(vec![
            "Title: \"Database System Concepts\"".to_string(),
            "CLO 1: Design normalized schemas\nTopic 1: SQL\nILO 1: Write joins".to_string(),
        ]);
        let stub = Arc::new(provider);
        let synthesizer = OutcomeSynthesizer::new(stub.clone());

        let outcomes = synthesizer
            .synthesize(&sample_spec(), "Topic: SQL\nTitle: DSC")
            .await
            .unwrap();

        assert!(outcomes.as_str().contains("CLO 1"));

        // the generation prompt must carry only the filtered list
        let prompts = stub.recorded_prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Filter out sources"));
        assert!(prompts[1].contains("Database System Concepts"));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let synthesizer = OutcomeSynthesizer::new(Arc::new(StubProvider::failing()));
        assert!(
            synthesizer
                .synthesize(&sample_spec(), "Topic: SQL")
                .await
                .is_err()
        );
    }
}
