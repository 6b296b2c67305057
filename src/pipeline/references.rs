//! Reference Gatherer
//!
//! Second pipeline stage: runs every planned query against the scholarly
//! search provider and aggregates hits per topic, in instructional order.
//!
//! Per-query isolation: a query whose searches exhaust all credentials is
//! skipped with a recorded degradation; one bad query must not blank out
//! the whole reference set. A query returning zero hits stays in the set
//! with an empty hit list. No deduplication across topics: a source echoed
//! for two topics is included twice, because coverage per topic matters
//! more than global dedup.

use tracing::info;

use crate::search::SharedSearch;
use crate::types::{Degradation, RunDiagnostics, SearchHit, TopicQuery};

/// Hits gathered for one topic.
#[derive(Debug, Clone)]
pub struct TopicReferences {
    pub topic: String,
    pub hits: Vec<SearchHit>,
}

/// Ordered per-topic search results. Ordering follows the planned query
/// list (instructional sequence), not a map's key order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    pub entries: Vec<TopicReferences>,
}

impl ReferenceSet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.topic.as_str())
    }

    pub fn total_hits(&self) -> usize {
        self.entries.iter().map(|e| e.hits.len()).sum()
    }

    /// Flatten into one annotated text block consumed by the outcome
    /// synthesizer.
    pub fn to_prompt_block(&self) -> String {
        let mut block = String::new();
        for entry in &self.entries {
            block.push_str(&format!("Topic: {}\nResults:\n", entry.topic));
            for hit in &entry.hits {
                block.push_str(&format!(
                    "Title: {}\nLink: {}\nSnippet: {}\nPublication Summary: {}\n\n",
                    hit.title,
                    hit.link.as_deref().unwrap_or("N/A"),
                    hit.snippet.as_deref().unwrap_or("N/A"),
                    hit.publication_summary.as_deref().unwrap_or("N/A"),
                ));
            }
            block.push('\n');
        }
        block
    }
}

pub struct ReferenceGatherer {
    search: SharedSearch,
}

impl ReferenceGatherer {
    pub fn new(search: SharedSearch) -> Self {
        Self { search }
    }

    /// Gather hits for every planned query. Never fails the run: search
    /// provider errors degrade at query granularity.
    pub async fn gather(
        &self,
        queries: &[TopicQuery],
        results_per_query: usize,
        diagnostics: &mut RunDiagnostics,
    ) -> ReferenceSet {
        let mut set = ReferenceSet::default();

        for query in queries {
            match self.search.search(&query.query, results_per_query).await {
                Ok(hits) => {
                    info!("'{}': {} hit(s)", query.topic, hits.len());
                    set.entries.push(TopicReferences {
                        topic: query.topic.clone(),
                        hits,
                    });
                }
                Err(e) => {
                    diagnostics.record(Degradation::new(
                        "reference-gatherer",
                        query.query.clone(),
                        e.to_string(),
                    ));
                }
            }
        }

        info!(
            "Gathered {} hit(s) across {} topic(s)",
            set.total_hits(),
            set.entries.len()
        );
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{FailingSearch, StubSearch};
    use std::sync::Arc;

    fn queries() -> Vec<TopicQuery> {
        vec![
            TopicQuery {
                topic: "Relational Model".to_string(),
                query: "relational model textbook".to_string(),
            },
            TopicQuery {
                topic: "SQL".to_string(),
                query: "sql textbook".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_topics_subset_of_input_in_order() {
        let gatherer = ReferenceGatherer::new(Arc::new(StubSearch::with_hits(2)));
        let mut diagnostics = RunDiagnostics::new();

        let set = gatherer.gather(&queries(), 2, &mut diagnostics).await;
        let topics: Vec<&str> = set.topics().collect();
        assert_eq!(topics, vec!["Relational Model", "SQL"]);
        assert_eq!(set.total_hits(), 4);
        assert!(diagnostics.is_clean());
    }

    #[tokio::test]
    async fn test_zero_hit_topic_included_with_empty_list() {
        let gatherer = ReferenceGatherer::new(Arc::new(StubSearch::with_hits(0)));
        let mut diagnostics = RunDiagnostics::new();

        let set = gatherer.gather(&queries(), 3, &mut diagnostics).await;
        assert_eq!(set.entries.len(), 2);
        assert!(set.entries.iter().all(|e| e.hits.is_empty()));
    }

    #[tokio::test]
    async fn test_failed_query_skipped_with_diagnostic() {
        let gatherer = ReferenceGatherer::new(Arc::new(FailingSearch::for_query("sql textbook")));
        let mut diagnostics = RunDiagnostics::new();

        let set = gatherer.gather(&queries(), 3, &mut diagnostics).await;
        let topics: Vec<&str> = set.topics().collect();
        assert_eq!(topics, vec!["Relational Model"]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.degradations[0].subject, "sql textbook");
        assert!(diagnostics.degradations[0].cause.contains("401"));
    }

    #[tokio::test]
    async fn test_prompt_block_annotates_hits() {
        let gatherer = ReferenceGatherer::new(Arc::new(StubSearch::with_hits(1)));
        let mut diagnostics = RunDiagnostics::new();

        let set = gatherer.gather(&queries(), 1, &mut diagnostics).await;
        let block = set.to_prompt_block();
        assert!(block.contains("Topic: Relational Model"));
        assert!(block.contains("Title: "));
        assert!(block.contains("Publication Summary: "));
    }
}
