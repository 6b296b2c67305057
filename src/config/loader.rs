//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/courseloom/config.toml)
//! 3. Project config (.courseloom/config.toml)
//! 4. Environment variables (COURSELOOM_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::types::{LoomError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Merge global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        // Merge project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // Merge environment variables (e.g., COURSELOOM_LLM__MODEL -> llm.model).
        // Double underscore separates sections so field names keep theirs.
        figment = figment.merge(Env::prefixed("COURSELOOM_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| LoomError::Config(format!("Configuration error: {}", e)))?;

        // Validate configuration after loading
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| LoomError::Config(format!("Configuration error: {}", e)))
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/courseloom/)
    pub fn global_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "courseloom")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".courseloom/config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(".courseloom")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            let toml = toml::to_string_pretty(&config)
                .map_err(|e| LoomError::Config(format!("Failed to serialize config: {}", e)))?;
            println!("{}", toml);
        }

        Ok(())
    }

    /// Initialize a project config file with commented defaults
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let path = Self::project_config_path();

        if path.exists() && !force {
            return Err(LoomError::Config(format!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            )));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, Self::config_template())?;

        Ok(path)
    }

    fn config_template() -> &'static str {
        r#"# courseloom configuration
version = "1.0"

[llm]
provider = "openai"
model = "gpt-4-turbo-preview"
# api_key = "sk-..."            # or set COURSELOOM_LLM__API_KEY / OPENAI_API_KEY
timeout_secs = 120
temperature = 0.5
max_tokens = 4000

[search]
# api_keys = ["...", "...", "..."]  # SerpAPI credentials, tried in order
results_per_query = 5
language = "en"
year_floor = 2020
timeout_secs = 30

[output]
directory = "course_outline_outputs"
log_file = "output_logs.json"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[llm]\nmodel = \"gpt-4o\"\n\n[search]\nresults_per_query = 3"
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.search.results_per_query, 3);
        // untouched defaults survive the merge
        assert_eq!(config.search.language, "en");
    }

    #[test]
    fn test_config_template_parses() {
        let config: Config = toml::from_str(ConfigLoader::config_template()).unwrap();
        assert!(config.validate().is_ok());
    }
}
