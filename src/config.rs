use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Rdf2RespecError;
use crate::mapping::RespecMapping;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rdf2respec: Rdf2RespecConfig,
}

/// rdf2respec-specific configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Rdf2RespecConfig {
    /// YAML file listing the sources to render.
    pub sources_file: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Documents rendered in parallel.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_workers() -> usize {
    4
}

fn default_file_extension() -> String {
    "ttl".to_string()
}

/// Top-level layout of the sources file
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesFile {
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// One input directory rendered with one mapping
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default)]
    pub name: Option<String>,
    pub input_location: PathBuf,
    #[serde(default)]
    pub ignore_paths_with: Vec<String>,
    pub output_location: PathBuf,
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    #[serde(rename = "reSpecMapping", alias = "respecMapping")]
    pub respec_mapping: RespecMapping,
}

impl Source {
    /// Configured name, or the input directory's name.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        self.input_location
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.input_location.display().to_string())
    }
}

/// Parse a sources file body.
pub fn parse_sources(yaml: &str) -> crate::error::Result<Vec<Source>> {
    let file: SourcesFile = serde_yaml_ng::from_str(yaml)
        .map_err(|e| Rdf2RespecError::Config(format!("Failed to parse sources: {}", e)))?;
    Ok(file.sources)
}

/// Read and parse a sources file.
pub fn load_sources(path: &Path) -> crate::error::Result<Vec<Source>> {
    let yaml = std::fs::read_to_string(path).map_err(|e| {
        Rdf2RespecError::Config(format!("Failed to read sources file {}: {}", path.display(), e))
    })?;
    parse_sources(&yaml)
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in RDF2RESPEC_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        let _ = dotenv::dotenv();

        let config_path = std::env::var("RDF2RESPEC_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.rdf2respec.workers == 0 {
            anyhow::bail!("rdf2respec.workers must be greater than 0");
        }

        if !self.rdf2respec.sources_file.is_file() {
            anyhow::bail!(
                "sources_file does not exist: {}. Set sources_file in config.toml to your sources YAML.",
                self.rdf2respec.sources_file.display()
            );
        }

        Ok(())
    }

    /// Load the sources listed in `sources_file`
    pub fn sources(&self) -> Result<Vec<Source>> {
        load_sources(&self.rdf2respec.sources_file)
            .with_context(|| format!("Invalid sources file {}", self.rdf2respec.sources_file.display()))
    }

    pub fn sources_file(&self) -> &Path {
        &self.rdf2respec.sources_file
    }

    pub fn workers(&self) -> usize {
        self.rdf2respec.workers
    }

    pub fn log_level(&self) -> &str {
        &self.rdf2respec.log_level
    }
}
