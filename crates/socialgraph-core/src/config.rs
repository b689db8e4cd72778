//! Configuration management for social graph tools.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`SOCIALGRAPH__` prefix, `__` separator)
//! 2. Config file (`socialgraph.toml`, optional)
//! 3. Defaults

use serde::Deserialize;

use crate::error::CoreError;
use crate::types::Page;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub neo4j: Neo4jSettings,

    #[serde(default)]
    pub pagination: PaginationSettings,
}

/// Neo4j connection settings (`[neo4j]`).
#[derive(Debug, Clone, Deserialize)]
pub struct Neo4jSettings {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

/// List query windowing (`[pagination]`).
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSettings {
    /// Limit used when the caller gives none.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Upper bound applied to caller-supplied limits.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
}

impl PaginationSettings {
    /// Build a page from optional caller input, clamping the limit.
    pub fn page(&self, limit: Option<u32>, offset: Option<u32>) -> Page {
        let limit = limit.unwrap_or(self.default_limit).min(self.max_limit);
        Page::new(limit, offset.unwrap_or(0))
    }
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_limit() -> u32 {
    Page::DEFAULT_LIMIT
}

fn default_max_limit() -> u32 {
    500
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: String::new(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl AppConfig {
    /// Load from `<file_prefix>.toml` (if present) and `SOCIALGRAPH__*` env vars.
    pub fn load(file_prefix: &str) -> Result<Self, CoreError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("SOCIALGRAPH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: AppConfig = cfg.try_deserialize()?;
        tracing::debug!(uri = %loaded.neo4j.uri, "Loaded configuration");
        Ok(loaded)
    }

    /// Parse a TOML document on top of the defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, CoreError> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }
}
