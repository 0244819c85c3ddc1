//! Generator configuration, loaded from TOML.
//!
//! ```toml
//! [grammar]
//! axiom = "X"
//! iterations = 4
//!
//! [grammar.rules]
//! X = "F[-FX][/FX][+FX][*FX]"
//! F = "FF"
//!
//! [turtle]
//! angle = 25.0
//! width = 0.1
//! min_petal_length = 0.5
//! max_petal_length = 1.0
//! min_branch_length = 0.2
//! max_branch_length = 0.4
//! variance = 10.0
//!
//! [turtle.shrink]
//! length_scale = 0.8
//! width_scale = 0.7
//!
//! [jitter]
//! seed = 42
//! ```
//!
//! The numeric turtle parameters and the grammar have no defaults and must be present. Only
//! the safety limits, the lookahead mode and the jitter table have defaults.

use crate::grammar::{Grammar, RuleSet};
use crate::interpreter::TurtleConfig;
use crate::jitter::DEFAULT_JITTER_LEN;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default cap on `grammar.iterations`.
pub const DEFAULT_MAX_ITERATIONS: u32 = 12;

/// Default cap on the length of the expanded string.
pub const DEFAULT_MAX_SYMBOLS: usize = 1 << 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("iterations {iterations} exceeds limit {max}")]
    IterationLimit { iterations: u32, max: u32 },

    #[error("`{name}` = {value} is invalid: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    #[error("jitter table length must be at least 1")]
    EmptyJitterTable,

    #[error("turtle.max_stack_depth must be at least 1")]
    ZeroStackDepth,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrammarConfig {
    pub axiom: String,
    pub iterations: u32,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Largest expanded string the generator will build.
    #[serde(default = "default_max_symbols")]
    pub max_symbols: usize,
    pub rules: RuleSet,
}

impl GrammarConfig {
    pub fn grammar(&self) -> Grammar {
        Grammar::new(self.axiom.clone(), self.rules.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JitterConfig {
    /// Number of precomputed rotation-noise entries.
    #[serde(default = "default_jitter_len")]
    pub len: usize,
    /// Seed for the table and for segment sizing. Drawn at random when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            len: DEFAULT_JITTER_LEN,
            seed: None,
        }
    }
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}
fn default_max_symbols() -> usize {
    DEFAULT_MAX_SYMBOLS
}
fn default_jitter_len() -> usize {
    DEFAULT_JITTER_LEN
}

/// Everything needed to run a generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    pub grammar: GrammarConfig,
    pub turtle: TurtleConfig,
    #[serde(default)]
    pub jitter: JitterConfig,
}

impl TreeConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the TOML file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded tree config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Rejects values that would make generation undefined.
    ///
    /// Extreme but finite parameters are accepted; they produce degenerate geometry, not
    /// failures. Shrink factors must be non-zero: `]` is defined as their inverse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.grammar;
        if g.iterations > g.max_iterations {
            return Err(ConfigError::IterationLimit {
                iterations: g.iterations,
                max: g.max_iterations,
            });
        }

        let t = &self.turtle;
        let finite = [
            ("turtle.angle", t.angle),
            ("turtle.width", t.width),
            ("turtle.min_petal_length", t.min_petal_length),
            ("turtle.max_petal_length", t.max_petal_length),
            ("turtle.min_branch_length", t.min_branch_length),
            ("turtle.max_branch_length", t.max_branch_length),
            ("turtle.variance", t.variance),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
        }

        let shrink = [
            ("turtle.shrink.length_scale", t.shrink.length_scale),
            ("turtle.shrink.width_scale", t.shrink.width_scale),
        ];
        for (name, value) in shrink {
            if !value.is_finite() || value == 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value,
                    reason: "must be finite and non-zero",
                });
            }
        }

        if t.max_stack_depth == 0 {
            return Err(ConfigError::ZeroStackDepth);
        }
        if self.jitter.len == 0 {
            return Err(ConfigError::EmptyJitterTable);
        }
        Ok(())
    }
}
