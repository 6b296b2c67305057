//! Config Command
//!
//! Manage courseloom configuration.
//!
//! Usage:
//!   courseloom config show [-f json]
//!   courseloom config path
//!   courseloom config init [--force]

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show merged effective configuration
pub fn show(format: &str) -> Result<()> {
    ConfigLoader::show_config(format == "json")
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize a project configuration file
pub fn init(force: bool) -> Result<()> {
    let path = ConfigLoader::init_project(force)?;
    let out = Output::new();
    out.success("Initialized configuration");
    out.info(&format!("Config: {}", path.display()));
    out.info("Add your OpenAI and SerpAPI credentials before running 'courseloom generate'");
    Ok(())
}
