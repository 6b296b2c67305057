//! Generate Command
//!
//! Run the full pipeline for one course spec and write the rendered
//! outline plus a run-log record.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ai::{OpenAiProvider, ProviderConfig, SharedProvider};
use crate::cli::Output;
use crate::config::Config;
use crate::pipeline::CoursePipeline;
use crate::render::{OUTPUT_EXTENSION, OutlineRenderer};
use crate::runlog::{RunLog, RunRecord};
use crate::search::{SerpApiClient, SharedSearch};
use crate::types::{CourseSpec, Result};

/// Options collected from CLI flags.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub spec: CourseSpec,
    /// Explicit output title; derived from the course title when absent
    pub output_title: Option<String>,
    /// Model override for this run
    pub model: Option<String>,
}

pub fn run(config: Config, options: GenerateOptions) -> Result<PathBuf> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_async(config, options))
}

async fn run_async(mut config: Config, options: GenerateOptions) -> Result<PathBuf> {
    let out = Output::new();
    let mut spec = options.spec;
    spec.validate()?;

    if let Some(model) = options.model {
        config.llm.model = model;
    }

    // Clients are built once here and owned by this run only
    let provider: SharedProvider = Arc::new(OpenAiProvider::new(ProviderConfig::from(&config.llm))?);
    let search: SharedSearch = Arc::new(SerpApiClient::new(&config.search)?);
    let pipeline = CoursePipeline::new(provider, search, config.search.results_per_query);

    if spec.description.trim().is_empty() {
        out.info("No description provided, drafting one");
        pipeline.draft_description(&mut spec).await?;
    }

    out.section("Generating course outline");
    out.info("Planning topics and searching for reference materials...");
    let report = pipeline.run(&spec).await?;
    out.success("Course outline generated");

    for degradation in &report.diagnostics.degradations {
        out.warning(&degradation.to_string());
    }

    let renderer = OutlineRenderer::new();
    let bytes = renderer.render(&report.outline)?;

    let filename = match options.output_title {
        Some(title) if !title.trim().is_empty() => {
            // tolerate operators typing the extension themselves
            let stem = title.trim().trim_end_matches(&format!(".{OUTPUT_EXTENSION}")).to_string();
            format!("{stem}.{OUTPUT_EXTENSION}")
        }
        _ => renderer.derive_filename(&report.outline),
    };

    fs::create_dir_all(&config.output.directory)?;
    let output_path = config.output.directory.join(filename);
    fs::write(&output_path, &bytes)?;
    out.success(&format!("Saved outline to {}", output_path.display()));

    RunLog::new(&config.output.log_file).append(RunRecord::from_report(
        &spec,
        &report,
        &output_path,
    ))?;

    out.header("Learning Outcomes");
    println!("{}", report.outcomes);
    out.info(&format!("Execution time: {:.1}s", report.elapsed_secs));

    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_carry_model_override() {
        let options = GenerateOptions {
            spec: CourseSpec {
                title: "Intro to Databases".to_string(),
                description: String::new(),
                instructor: "Dr. X".to_string(),
                target_audience: "undergraduates".to_string(),
                credit_units: 3,
                total_hours: 54,
                weekly_hours: 3,
                citation_style: "APA".to_string(),
                topic_count: 5,
            },
            output_title: Some("Databases_Syllabus".to_string()),
            model: Some("gpt-4o".to_string()),
        };
        assert_eq!(options.model.as_deref(), Some("gpt-4o"));
    }
}
