//! Configuration loading and resolution
//!
//! TOML file with environment-variable overrides for secrets.
//! Resolution priority: command-line argument → `UFORGE_CONFIG` env var →
//! platform config directory → compiled defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Top-level TOML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file path
    pub database_path: Option<String>,

    /// Fixed domain appended when pairing usernames with addresses
    #[serde(default = "default_email_domain")]
    pub email_domain: String,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Scoring oracle endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Chat-completions endpoint URL
    #[serde(default = "default_scoring_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with each request
    #[serde(default = "default_scoring_model")]
    pub model: String,

    /// API key (prefer the UFORGE_SCORING_API_KEY environment variable)
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Number of independent scoring oracles per batch
    #[serde(default = "default_oracle_count")]
    pub oracle_count: u32,

    /// Minimum interval between oracle requests, in milliseconds
    #[serde(default = "default_scoring_rate_limit_ms")]
    pub rate_limit_ms: u64,
}

/// Search oracle endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Custom-search endpoint URL
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// API key (prefer the UFORGE_SEARCH_API_KEY environment variable)
    pub api_key: Option<String>,

    /// Search engine identifier (prefer UFORGE_SEARCH_ENGINE_ID)
    pub engine_id: Option<String>,

    /// Minimum interval between search requests, in milliseconds
    #[serde(default = "default_search_rate_limit_ms")]
    pub rate_limit_ms: u64,
}

/// Pipeline cycle defaults (overridable from the CLI)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raw candidates generated per cycle
    #[serde(default = "default_raw_count")]
    pub raw_count: u32,

    /// Top-ranked candidates carried into validation
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Require the candidate as a standalone token in the snippet
    #[serde(default)]
    pub strict_match: bool,

    /// Remove source score records after a validation batch
    #[serde(default)]
    pub consume_source: bool,
}

fn default_email_domain() -> String {
    "gmail.com".to_string()
}

fn default_scoring_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_scoring_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.8
}

fn default_oracle_count() -> u32 {
    3
}

fn default_scoring_rate_limit_ms() -> u64 {
    1000
}

fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_search_rate_limit_ms() -> u64 {
    1000
}

fn default_raw_count() -> u32 {
    50
}

fn default_top_k() -> u32 {
    7
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            endpoint: default_scoring_endpoint(),
            model: default_scoring_model(),
            api_key: None,
            temperature: default_temperature(),
            oracle_count: default_oracle_count(),
            rate_limit_ms: default_scoring_rate_limit_ms(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key: None,
            engine_id: None,
            rate_limit_ms: default_search_rate_limit_ms(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_count: default_raw_count(),
            top_k: default_top_k(),
            strict_match: false,
            consume_source: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            email_domain: default_email_domain(),
            scoring: ScoringConfig::default(),
            search: SearchConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration following the priority order:
    /// 1. Explicit path (command-line argument)
    /// 2. `UFORGE_CONFIG` environment variable
    /// 3. `<config dir>/uforge/uforge.toml`
    /// 4. Compiled defaults
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_path {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var("UFORGE_CONFIG") {
            return Self::from_file(Path::new(&path));
        }

        if let Some(path) = default_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Parse configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Resolve the database file path, falling back to the platform data directory
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.database_path {
            return PathBuf::from(path);
        }

        dirs::data_local_dir()
            .map(|d| d.join("uforge").join("uforge.db"))
            .unwrap_or_else(|| PathBuf::from("uforge.db"))
    }

    /// Resolve the scoring API key, priority ENV → TOML
    pub fn scoring_api_key(&self) -> Result<String> {
        resolve_secret(
            "UFORGE_SCORING_API_KEY",
            self.scoring.api_key.as_deref(),
            "scoring API key",
        )
    }

    /// Resolve the search API key, priority ENV → TOML
    pub fn search_api_key(&self) -> Result<String> {
        resolve_secret(
            "UFORGE_SEARCH_API_KEY",
            self.search.api_key.as_deref(),
            "search API key",
        )
    }

    /// Resolve the search engine id, priority ENV → TOML
    pub fn search_engine_id(&self) -> Result<String> {
        resolve_secret(
            "UFORGE_SEARCH_ENGINE_ID",
            self.search.engine_id.as_deref(),
            "search engine id",
        )
    }
}

/// Validate a secret value (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn resolve_secret(env_var: &str, toml_value: Option<&str>, what: &str) -> Result<String> {
    let env_value = std::env::var(env_var).ok().filter(|k| is_valid_key(k));
    let toml_value = toml_value.filter(|k| is_valid_key(k));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both {} and config file; using environment (highest priority)",
            what, env_var
        );
    }

    if let Some(key) = env_value {
        return Ok(key);
    }
    if let Some(key) = toml_value {
        return Ok(key.to_string());
    }

    Err(Error::Config(format!(
        "{} not configured. Set {} or add it to the config file.",
        what, env_var
    )))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("uforge").join("uforge.toml"))
}
