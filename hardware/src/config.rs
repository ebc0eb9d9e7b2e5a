//! Simulator configuration.
//!
//! Configuration is read from TOML. Every section and every field is
//! optional; anything left out takes the value of the reference machine
//! from [`crate::common::constants`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::constants::{
    CODE_BASE, DATA_WORDS, INSTRUCTION_WIDTH, MAX_CYCLES, REGISTER_COUNT,
};
use crate::common::SimError;

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub system: SystemConfig,
    pub memory: MemoryConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Emit a `tracing` event for every stage of every cycle.
    pub trace_instructions: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SystemConfig {
    #[serde(default = "default_code_base")]
    pub code_base: u32,

    #[serde(default = "default_instruction_width")]
    pub instruction_width: u32,

    #[serde(default = "default_register_count")]
    pub register_count: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            code_base: default_code_base(),
            instruction_width: default_instruction_width(),
            register_count: default_register_count(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemoryConfig {
    #[serde(default = "default_data_words")]
    pub data_words: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_words: default_data_words(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Cycle budget of a run when the command line gives none.
    #[serde(default = "default_max_cycles")]
    pub max_cycles: u64,

    /// Hold decode for a cycle when it reads the destination of the load
    /// directly ahead of it.
    #[serde(default)]
    pub load_use_interlock: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_cycles: default_max_cycles(),
            load_use_interlock: false,
        }
    }
}

fn default_code_base() -> u32 {
    CODE_BASE
}

fn default_instruction_width() -> u32 {
    INSTRUCTION_WIDTH
}

fn default_register_count() -> usize {
    REGISTER_COUNT
}

fn default_data_words() -> usize {
    DATA_WORDS
}

fn default_max_cycles() -> u64 {
    MAX_CYCLES
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects configurations the pipeline cannot be built from.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.system.register_count == 0 {
            return Err(SimError::InvalidConfig(
                "system.register_count must be at least 1".to_string(),
            ));
        }
        if self.system.instruction_width == 0 {
            return Err(SimError::InvalidConfig(
                "system.instruction_width must be at least 1".to_string(),
            ));
        }
        if self.memory.data_words == 0 {
            return Err(SimError::InvalidConfig(
                "memory.data_words must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
