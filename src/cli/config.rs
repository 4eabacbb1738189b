//! CLI configuration file support
//!
//! Handles parsing of `.uml-schema.toml` and environment variable overrides.
//! Command-line flags are applied on top by the caller.

use crate::export::sql::GeneratorOptions;
use crate::models::CollisionPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".uml-schema.toml";

/// Environment variable for the naming-collision policy (`warn` or `suffix`)
pub const ENV_COLLISION_POLICY: &str = "UML_SCHEMA_COLLISION_POLICY";

/// Environment variable toggling the banner comments (`true`/`false`)
pub const ENV_BANNER: &str = "UML_SCHEMA_BANNER";

/// Main configuration structure
///
/// ```toml
/// [generator]
/// collision_policy = "suffix"
/// include_banner = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub generator: GeneratorOptions,
}

impl CliConfig {
    /// Load configuration from a directory, falling back to defaults when no file
    /// exists, then apply environment overrides.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut config = Self::load_file(dir)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Read `.uml-schema.toml` from a directory without consulting the environment
    pub fn load_file(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid {}", config_path.display()))
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Apply environment variable overrides. Unparseable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, keyed by the `UML_SCHEMA_*` variable names
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(policy) = lookup(ENV_COLLISION_POLICY) {
            match policy.parse::<CollisionPolicy>() {
                Ok(policy) => self.generator.collision_policy = policy,
                Err(e) => warn!("Ignoring {}: {}", ENV_COLLISION_POLICY, e),
            }
        }

        if let Some(banner) = lookup(ENV_BANNER) {
            match banner.trim().parse::<bool>() {
                Ok(banner) => self.generator.include_banner = banner,
                Err(_) => warn!("Ignoring {}: expected true or false, got {}", ENV_BANNER, banner),
            }
        }
    }
}
