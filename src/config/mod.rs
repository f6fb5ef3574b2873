// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! User configuration loading.
//!
//! The configuration file is optional TOML. It can extend the command
//! registry, add risk patterns and control the explanation layer:
//!
//! - **Registry**: extra categories, multi-word families and wrappers
//! - **Patterns**: custom regex or token-rule patterns, validated and merged
//!   into the built-in library
//! - **Explainer**: enable flag and timeout for the explanation generator
//!
//! Everything is read once at startup. The resulting registry and library
//! are immutable.
//!
//! # Example
//!
//! ```no_run
//! use cmd_risk_inspector::config::AppConfig;
//!
//! let config = AppConfig::load(None)?;
//! let parser = config.parser();
//! let engine = config.engine()?;
//!
//! let parsed = parser.parse("terraform destroy")?;
//! println!("{}", engine.assess(&parsed).summary);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;

pub use error::ConfigError;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::core::{CommandCategory, CommandParser, CommandRegistry};
use crate::risk::{PatternLibrary, RiskDimension, RiskEngine, RiskPattern, TokenRule};

/// Default location of the configuration file, before tilde expansion.
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/cmd-risk-inspector/config.toml";

/// Default explanation timeout in seconds.
const DEFAULT_EXPLAIN_TIMEOUT_SECS: u64 = 15;

/// Parsed configuration file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub registry: RegistryConfig,
    pub explainer: ExplainerSettings,
    pub patterns: Vec<PatternConfig>,
}

/// Custom registry entries merged over the built-in tables.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub multi_word: Vec<String>,
    pub wrappers: Vec<String>,
    /// Wrapper options that consume the next token, per wrapper
    pub wrapper_options: BTreeMap<String, Vec<String>>,
    pub categories: BTreeMap<String, CommandCategory>,
}

/// Settings for the optional explanation generator.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExplainerSettings {
    pub enabled: bool,
    pub timeout_secs: u64,
}

impl Default for ExplainerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: DEFAULT_EXPLAIN_TIMEOUT_SECS,
        }
    }
}

impl ExplainerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// One `[[patterns]]` entry.
///
/// Exactly one of `regex` and `tokens` must be given. Regexes ignore case
/// unless `case_sensitive` is set.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternConfig {
    pub id: String,
    pub dimension: RiskDimension,
    /// Wider than the pattern weight so out-of-range values can be reported
    pub weight: u32,
    pub description: String,
    #[serde(default)]
    pub regex: Option<String>,
    #[serde(default)]
    pub tokens: Option<TokenRule>,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl PatternConfig {
    /// Converts the entry into a validated-weight [`RiskPattern`].
    ///
    /// # Errors
    /// - `ConfigError::InvalidWeight` when the weight is outside 1-100
    /// - `ConfigError::AmbiguousMatcher` unless exactly one matcher is set
    /// - `ConfigError::InvalidRegex` when the regex does not compile
    pub fn to_pattern(&self) -> Result<RiskPattern, ConfigError> {
        let weight = u8::try_from(self.weight)
            .ok()
            .filter(|w| (1..=100).contains(w))
            .ok_or_else(|| ConfigError::InvalidWeight {
                id: self.id.clone(),
                weight: self.weight,
            })?;

        match (&self.regex, &self.tokens) {
            (Some(expr), None) if self.case_sensitive => RiskPattern::regex_case_sensitive(
                &self.id,
                self.dimension,
                weight,
                &self.description,
                expr,
            ),
            (Some(expr), None) => {
                RiskPattern::regex(&self.id, self.dimension, weight, &self.description, expr)
            }
            (None, Some(rule)) => Ok(RiskPattern::tokens(
                &self.id,
                self.dimension,
                weight,
                &self.description,
                rule.clone(),
            )),
            _ => Err(ConfigError::AmbiguousMatcher(self.id.clone())),
        }
    }
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// With `path` set, that file must exist. Without it the default
    /// location is tried, and a missing default file yields the defaults.
    ///
    /// # Errors
    /// - `ConfigError::NotFound` if an explicit path does not exist
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::Toml` if the file is not valid configuration
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let path = expand_path(path);
                if !path.exists() {
                    return Err(ConfigError::NotFound(path));
                }
                Self::from_file(&path)
            }
            None => {
                let path = default_path();
                if !path.exists() {
                    debug!("No config at {}, using defaults", path.display());
                    return Ok(Self::default());
                }
                Self::from_file(&path)
            }
        }
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;

        info!(
            "Loaded config from {} ({} custom patterns)",
            path.display(),
            config.patterns.len()
        );
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Built-in registry with the custom entries merged in.
    pub fn build_registry(&self) -> CommandRegistry {
        let mut builder = CommandRegistry::builder();

        for (name, category) in &self.registry.categories {
            builder = builder.category(name, *category);
        }
        for name in &self.registry.multi_word {
            builder = builder.multi_word(name);
        }
        for name in &self.registry.wrappers {
            builder = builder.wrapper(name);
        }
        for (wrapper, options) in &self.registry.wrapper_options {
            for option in options {
                builder = builder.wrapper_option(wrapper, option);
            }
        }

        builder.build()
    }

    /// Built-in pattern library with the custom patterns merged in.
    ///
    /// # Errors
    /// The first invalid custom pattern, including ids that clash with a
    /// built-in or an earlier custom pattern.
    pub fn build_library(&self) -> Result<PatternLibrary, ConfigError> {
        let mut builder = PatternLibrary::builder();
        for entry in &self.patterns {
            builder = builder.pattern(entry.to_pattern()?)?;
            debug!("Registered custom pattern {}", entry.id);
        }
        Ok(builder.build())
    }

    /// Parser bound to the merged registry.
    pub fn parser(&self) -> CommandParser {
        CommandParser::new(self.build_registry())
    }

    /// Engine bound to the merged pattern library.
    pub fn engine(&self) -> Result<RiskEngine, ConfigError> {
        Ok(RiskEngine::new(self.build_library()?))
    }
}

/// Default configuration path with `~` expanded.
pub fn default_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref())
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

#[cfg(test)]
mod tests;
