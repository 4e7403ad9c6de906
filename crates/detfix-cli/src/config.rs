// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Defaults from an optional JSON file, overridden by flags.

use std::path::{Path, PathBuf};

use detfix_core::SineStrategy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::{Cli, OutputFormat, Repr, Strategy};

/// Sample count used when neither the flag nor the file sets one.
pub const DEFAULT_SAMPLES: u32 = 2000;

/// Error type for config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// Requested path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not a valid config document.
    #[error("invalid config {path}: {source}")]
    Serde {
        /// Requested path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// A value parsed but is unusable.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// On-disk shape. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub repr: Option<Repr>,
    pub format: Option<OutputFormat>,
    pub samples: Option<u32>,
    pub strategy: Option<Strategy>,
}

impl FileConfig {
    /// Reads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_slice(&bytes).map_err(|source| ConfigError::Serde {
            path: path.to_path_buf(),
            source,
        })?;
        if config.samples == Some(0) {
            return Err(ConfigError::Invalid("samples must be at least 1".to_owned()));
        }
        Ok(config)
    }
}

/// Effective settings for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub repr: Repr,
    pub format: OutputFormat,
    pub samples: u32,
    pub strategy: SineStrategy,
}

impl Settings {
    /// Flags win over the file; the file wins over built-in defaults.
    pub fn resolve(cli: &Cli, file: &FileConfig, samples_flag: Option<u32>) -> Self {
        let strategy = match cli.strategy.or(file.strategy) {
            Some(Strategy::Cordic) => SineStrategy::Cordic,
            Some(Strategy::Poly) | None => SineStrategy::Polynomial,
        };
        Self {
            repr: cli.repr.or(file.repr).unwrap_or(Repr::Fixed64),
            format: cli.format.or(file.format).unwrap_or(OutputFormat::Table),
            samples: samples_flag.or(file.samples).unwrap_or(DEFAULT_SAMPLES).max(1),
            strategy,
        }
    }
}
