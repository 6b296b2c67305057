//! Outline Planner
//!
//! Fourth pipeline stage: two-phase LLM protocol.
//!
//! 1. Narrative pass: free-text week-by-week activity schedule, with the
//!    week count computed from total and weekly hours. The model may
//!    stretch a topic across multiple weeks or introduce topics absent from
//!    the outcomes, for pacing.
//! 2. Schema-coercion pass: a second call given both the narrative output
//!    and the original metadata/outcomes, with the explicit target JSON
//!    schema, reshaping everything into the terminal contract. Title,
//!    description, and instructor are immutable across this pass.
//!
//! The coercion output is repaired/parsed and validated against the
//! explicit outline schema. A failure here is fatal to the run: the
//! renderer cannot produce a document without the full schema.

use tracing::{debug, info};

use super::prompts::{build_coercion_prompt, build_schedule_prompt};
use crate::ai::{CompletionRequest, SharedProvider, extract_json_from_response};
use crate::types::{CourseOutline, CourseSpec, Degradation, OutcomeSet, Result, RunDiagnostics};

const SYSTEM_MESSAGE: &str = "You are a curricular development expert.";

pub struct OutlinePlanner {
    provider: SharedProvider,
}

impl OutlinePlanner {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    /// Expand outcomes into a validated course outline.
    pub async fn plan_outline(
        &self,
        spec: &CourseSpec,
        outcomes: &OutcomeSet,
        diagnostics: &mut RunDiagnostics,
    ) -> Result<CourseOutline> {
        let week_count = spec.week_count()?;

        let narrative = self.draft_schedule(spec, outcomes, week_count).await?;
        debug!("Narrative schedule: {} chars", narrative.len());

        let outline = self.coerce_schema(spec, outcomes, &narrative).await?;
        info!(
            "Outline coerced: {} topic(s), {} activit(ies)",
            outline.topics.len(),
            outline.activities.len()
        );

        self.check_consistency(&outline, diagnostics);
        Ok(outline)
    }

    async fn draft_schedule(
        &self,
        spec: &CourseSpec,
        outcomes: &OutcomeSet,
        week_count: u32,
    ) -> Result<String> {
        let request =
            CompletionRequest::text(build_schedule_prompt(spec, outcomes.as_str(), week_count))
                .with_system(SYSTEM_MESSAGE);
        let response = self.provider.complete(&request).await?;
        Ok(response.text)
    }

    async fn coerce_schema(
        &self,
        spec: &CourseSpec,
        outcomes: &OutcomeSet,
        narrative: &str,
    ) -> Result<CourseOutline> {
        let request =
            CompletionRequest::json(build_coercion_prompt(spec, outcomes.as_str(), narrative))
                .with_system(SYSTEM_MESSAGE);
        let response = self.provider.complete(&request).await?;

        let value = extract_json_from_response(&response.text)?;
        CourseOutline::from_value(value)
    }

    /// Schedule topics are allowed to diverge from the topic list, but a
    /// mismatch is worth surfacing to the operator.
    fn check_consistency(&self, outline: &CourseOutline, diagnostics: &mut RunDiagnostics) {
        for activity in &outline.activities {
            let known = outline
                .topics
                .iter()
                .any(|t| t.topic.eq_ignore_ascii_case(&activity.topic));
            if !known {
                diagnostics.record(Degradation::new(
                    "outline-planner",
                    activity.week.clone(),
                    format!("activity topic '{}' not in topic list", activity.topic),
                ));
            }
        }
    }
}
