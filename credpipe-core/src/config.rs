//! Configuration system for credpipe.
//!
//! Uses `figment` for layered configuration: defaults -> `credpipe.toml`
//! in the working directory -> `CREDPIPE_*` environment variables.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Top-level configuration for a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub api: ApiConfig,
    pub paths: PathsConfig,
}

/// Registry API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the registry's public API.
    pub base_url: String,
    /// Records requested per page.
    pub page_size: u32,
    /// Hard cap on pages fetched before the run is failed. The
    /// registry signals end-of-data only with an empty page, so the
    /// cap is the sole defense against an endpoint that never empties.
    pub max_pages: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Restrict the harvest to Gold Standard certified projects.
    pub certified_only: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://public-api.goldstandard.org".to_string(),
            page_size: 150,
            max_pages: 1000,
            timeout_secs: 30,
            certified_only: true,
        }
    }
}

/// Artifact locations for each stage boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Raw merged table written by ingestion.
    pub raw: PathBuf,
    /// Cleaned table written by the cleaning stage.
    pub cleaned: PathBuf,
    /// Transformed table with derived features.
    pub transformed: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw: PathBuf::from("data/raw/gs_certified_projects.csv"),
            cleaned: PathBuf::from("data/staging/data.csv"),
            transformed: PathBuf::from("data/transformed/transform.csv"),
        }
    }
}

/// Load configuration, layering an optional TOML file and environment
/// variables (`CREDPIPE_API__PAGE_SIZE`, `CREDPIPE_PATHS__RAW`, ...)
/// over the defaults.
pub fn load_config(config_file: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(PipelineConfig::default()));

    match config_file {
        Some(path) => figment = figment.merge(Toml::file(path)),
        None => {
            let default_path = Path::new("credpipe.toml");
            if default_path.exists() {
                figment = figment.merge(Toml::file(default_path));
            }
        }
    }

    figment = figment.merge(Env::prefixed("CREDPIPE_").split("__"));

    figment.extract().map_err(|e| ConfigError::Extract(Box::new(e)))
}
