//! Course Outline Pipeline
//!
//! The multi-stage generation pipeline: query planning → reference
//! gathering → outcome synthesis → outline planning. Control flow is
//! strictly sequential; each stage's output becomes the next stage's
//! input, and every stage is a pure async function over typed data.
//!
//! The pipeline owns nothing long-lived: clients are constructed once per
//! run and passed in by the caller, so no rotation or session state leaks
//! across runs.

pub mod outcomes;
pub mod outline;
pub mod planner;
pub mod prompts;
pub mod references;

pub use outcomes::OutcomeSynthesizer;
pub use outline::OutlinePlanner;
pub use planner::QueryPlanner;
pub use references::{ReferenceGatherer, ReferenceSet, TopicReferences};

use std::time::Instant;
use tracing::info;

use crate::ai::{CompletionRequest, SharedProvider};
use crate::search::SharedSearch;
use crate::types::{CourseOutline, CourseSpec, OutcomeSet, Result, RunDiagnostics};

/// Everything a run produces besides the document bytes: the validated
/// outline, the intermediate outcome prose (shown to the operator), the
/// accumulated diagnostics, and the data the run log needs.
#[derive(Debug)]
pub struct RunReport {
    pub outline: CourseOutline,
    pub outcomes: OutcomeSet,
    pub diagnostics: RunDiagnostics,
    pub model: String,
    pub elapsed_secs: f64,
}

/// One pipeline run over injected clients.
pub struct CoursePipeline {
    provider: SharedProvider,
    search: SharedSearch,
    results_per_query: usize,
}

impl CoursePipeline {
    pub fn new(provider: SharedProvider, search: SharedSearch, results_per_query: usize) -> Self {
        Self {
            provider,
            search,
            results_per_query,
        }
    }

    /// Execute the full stage chain for one course spec.
    pub async fn run(&self, spec: &CourseSpec) -> Result<RunReport> {
        spec.validate()?;
        let started = Instant::now();
        let mut diagnostics = RunDiagnostics::new();

        info!("Planning topic queries");
        let queries = QueryPlanner::new(self.provider.clone())
            .plan(spec, &mut diagnostics)
            .await?;

        info!("Gathering scholarly references");
        let references = ReferenceGatherer::new(self.search.clone())
            .gather(&queries, self.results_per_query, &mut diagnostics)
            .await;

        info!("Synthesizing learning outcomes");
        let outcomes = OutcomeSynthesizer::new(self.provider.clone())
            .synthesize(spec, &references.to_prompt_block())
            .await?;

        info!("Planning course outline");
        let outline = OutlinePlanner::new(self.provider.clone())
            .plan_outline(spec, &outcomes, &mut diagnostics)
            .await?;

        Ok(RunReport {
            outline,
            outcomes,
            diagnostics,
            model: self.provider.model().to_string(),
            elapsed_secs: started.elapsed().as_secs_f64(),
        })
    }

    /// Draft a course description when the operator left it empty.
    /// Runs before the pipeline proper so every stage sees a populated spec.
    pub async fn draft_description(&self, spec: &mut CourseSpec) -> Result<()> {
        if !spec.description.trim().is_empty() {
            return Ok(());
        }

        info!("Drafting course description");
        let request = CompletionRequest::text(prompts::build_description_prompt(
            &spec.title,
            &spec.target_audience,
        ));
        let response = self.provider.complete(&request).await?;
        spec.description = response.text.trim().to_string();
        Ok(())
    }
}

// =============================================================================
// Test Support
// =============================================================================
