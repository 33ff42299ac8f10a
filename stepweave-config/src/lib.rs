//! Shared configuration loader for the stepweave toolchain.
//!
//! `defaults/stepweave.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`StepweaveConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use stepweave::format::Dialect;
use stepweave::{InjectOptions, PatternDescriptor, SyntaxPreference};

const DEFAULT_TOML: &str = include_str!("../defaults/stepweave.default.toml");

/// Top-level configuration consumed by stepweave applications.
#[derive(Debug, Clone, Deserialize)]
pub struct StepweaveConfig {
    pub inject: InjectConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub patterns: PatternsConfig,
}

/// Defaults for injection requests built by the CLI.
#[derive(Debug, Clone, Deserialize)]
pub struct InjectConfig {
    pub syntax: SyntaxPreference,
    pub apply: bool,
}

impl From<&InjectConfig> for InjectOptions {
    fn from(config: &InjectConfig) -> Self {
        InjectOptions {
            apply: config.apply,
            syntax: config.syntax,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub schema: Option<String>,
}

/// Caller patterns, one list per dialect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternsConfig {
    #[serde(default)]
    pub markdown: Vec<PatternConfig>,
    #[serde(default)]
    pub html: Vec<PatternConfig>,
    #[serde(default)]
    pub asciidoc: Vec<PatternConfig>,
    #[serde(default)]
    pub xml: Vec<PatternConfig>,
}

impl PatternsConfig {
    pub fn for_dialect(&self, dialect: Dialect) -> &[PatternConfig] {
        match dialect {
            Dialect::Markdown => &self.markdown,
            Dialect::Html => &self.html,
            Dialect::Asciidoc => &self.asciidoc,
            Dialect::Xml => &self.xml,
        }
    }

    /// Non-empty lists keyed by dialect name, as an injection request expects them.
    pub fn to_custom_patterns(&self) -> BTreeMap<String, Vec<PatternDescriptor>> {
        Dialect::ALL
            .into_iter()
            .filter(|dialect| !self.for_dialect(*dialect).is_empty())
            .map(|dialect| {
                let descriptors = self
                    .for_dialect(dialect)
                    .iter()
                    .map(PatternDescriptor::from)
                    .collect();
                (dialect.name().to_string(), descriptors)
            })
            .collect()
    }
}

/// One `[[patterns.<dialect>]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub regex: String,
    pub action: String,
    #[serde(default)]
    pub value_group: Option<usize>,
}

impl From<&PatternConfig> for PatternDescriptor {
    fn from(config: &PatternConfig) -> Self {
        PatternDescriptor {
            name: config.name.clone(),
            regex: config.regex.clone(),
            action: config.action.clone(),
            value_group: config.value_group,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<StepweaveConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<StepweaveConfig, ConfigError> {
    Loader::new().build()
}
