use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DbScrubError, Result};
use crate::statement::SqlDialect;

pub const ENV_ENABLED: &str = "DBSCRUB_ENABLED";
pub const ENV_CACHE_CAPACITY: &str = "DBSCRUB_CACHE_CAPACITY";
pub const ENV_MAX_STATEMENT_LENGTH: &str = "DBSCRUB_MAX_STATEMENT_LENGTH";
pub const ENV_DIALECT: &str = "DBSCRUB_DIALECT";

/// Sanitizer configuration. Read once and copied into each facade at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Master switch. When false both facades pass input through. Default: true.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Entries memoized per facade. 0 disables memoization. Default: 1000.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Sanitized SQL is truncated to this many bytes, and raw statements longer
    /// than this are never memoized. Default: 32 KiB.
    #[serde(default = "default_max_statement_length")]
    pub max_statement_length: usize,

    /// Lexing of double-quoted runs.
    #[serde(default)]
    pub dialect: SqlDialect,
}

fn default_enabled() -> bool {
    true
}
fn default_cache_capacity() -> usize {
    1000
}
fn default_max_statement_length() -> usize {
    32 * 1024
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_capacity: 1000,
            max_statement_length: 32 * 1024,
            dialect: SqlDialect::default(),
        }
    }
}

impl SanitizerConfig {
    /// Load config from a YAML file. Returns default if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self =
            serde_yaml::from_str(&contents).map_err(|e| DbScrubError::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        tracing::debug!(
            "loaded sanitizer config from {}: enabled={}, cache_capacity={}",
            path.display(),
            config.enabled,
            config.cache_capacity
        );
        Ok(config)
    }

    /// Load config from the project root. Checks `.dbscrub/config.yml`.
    pub fn load_project(project_root: &Path) -> Result<Self> {
        let path = project_root.join(".dbscrub").join("config.yml");
        Self::load_from(&path)
    }

    /// Full resolution: project file, falling back to `~/.config/dbscrub/config.yml`,
    /// then environment overrides, then validation.
    pub fn load(project_root: &Path) -> Result<Self> {
        let project_path = project_root.join(".dbscrub").join("config.yml");
        let config = if project_path.exists() {
            Self::load_from(&project_path)?
        } else {
            Self::load_from(&super::dirs_global().join("config.yml"))?
        };
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `DBSCRUB_*` environment variables on top of this config.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source. Unparseable values are
    /// logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_ENABLED) {
            match parse_bool(&raw) {
                Some(enabled) => self.enabled = enabled,
                None => tracing::warn!("ignoring {}: expected a boolean", ENV_ENABLED),
            }
        }
        if let Some(raw) = lookup(ENV_CACHE_CAPACITY) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) => self.cache_capacity = capacity,
                Err(e) => tracing::warn!("ignoring {}: {}", ENV_CACHE_CAPACITY, e),
            }
        }
        if let Some(raw) = lookup(ENV_MAX_STATEMENT_LENGTH) {
            match raw.trim().parse::<usize>() {
                Ok(length) => self.max_statement_length = length,
                Err(e) => tracing::warn!("ignoring {}: {}", ENV_MAX_STATEMENT_LENGTH, e),
            }
        }
        if let Some(raw) = lookup(ENV_DIALECT) {
            match raw.trim().parse::<SqlDialect>() {
                Ok(dialect) => self.dialect = dialect,
                Err(e) => tracing::warn!("ignoring {}: {}", ENV_DIALECT, e),
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_statement_length == 0 {
            return Err(DbScrubError::InvalidConfig {
                reason: "max_statement_length must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
