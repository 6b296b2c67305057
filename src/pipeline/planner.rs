//! Query Planner
//!
//! First pipeline stage: asks the LLM to decompose course metadata into
//! (topic, search query) pairs under a JSON contract.
//!
//! Failure policy: a provider error propagates and aborts the run; a
//! malformed response degrades to an empty query list with a recorded
//! diagnostic, letting downstream stages produce a mediocre outline
//! instead of a hard crash.

use serde::Deserialize;
use tracing::{info, warn};

use super::prompts::build_query_prompt;
use crate::ai::{CompletionRequest, SharedProvider, extract_json_from_response};
use crate::types::{CourseSpec, Degradation, Result, RunDiagnostics, TopicQuery};

pub struct QueryPlanner {
    provider: SharedProvider,
}

#[derive(Debug, Deserialize)]
struct QueryPlan {
    #[serde(default)]
    queries: Vec<TopicQuery>,
}

impl QueryPlanner {
    pub fn new(provider: SharedProvider) -> Self {
        Self { provider }
    }

    /// Plan at most `spec.topic_count` queries, in instructional order.
    pub async fn plan(
        &self,
        spec: &CourseSpec,
        diagnostics: &mut RunDiagnostics,
    ) -> Result<Vec<TopicQuery>> {
        let request = CompletionRequest::json(build_query_prompt(spec));
        let response = self.provider.complete(&request).await?;

        let queries = match self.parse_plan(&response.text) {
            Ok(queries) => queries,
            Err(e) => {
                diagnostics.record(Degradation::new(
                    "query-planner",
                    spec.title.clone(),
                    e.to_string(),
                ));
                return Ok(Vec::new());
            }
        };

        let mut queries = queries;
        if queries.len() > spec.topic_count {
            warn!(
                "Planner returned {} queries, truncating to {}",
                queries.len(),
                spec.topic_count
            );
            queries.truncate(spec.topic_count);
        }

        // Drop pairs the model left blank rather than passing them to search
        queries.retain(|q| !q.topic.trim().is_empty() && !q.query.trim().is_empty());

        info!("Planned {} topic quer(ies)", queries.len());
        Ok(queries)
    }

    fn parse_plan(&self, raw: &str) -> Result<Vec<TopicQuery>> {
        let value = extract_json_from_response(raw)?;
        let plan: QueryPlan = serde_json::from_value(value)?;
        Ok(plan.queries)
    }
}
