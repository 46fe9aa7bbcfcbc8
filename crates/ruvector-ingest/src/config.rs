//! Configuration for document ingestion

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::tokens::DEFAULT_CHARS_PER_TOKEN;

/// Main ingestion configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Tokenizer configuration
    pub tokenizer: TokenizerConfig,
    /// Directory discovery configuration
    pub discovery: DiscoveryConfig,
    /// Batch processing configuration
    pub processing: ProcessingConfig,
    /// Token-budget packing configuration
    pub packing: PackingConfig,
}

impl IngestConfig {
    /// Parse a configuration from TOML. Missing sections take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.tokenizer.chars_per_token == 0 {
            return Err(Error::config("tokenizer.chars_per_token must be positive"));
        }
        if self.packing.token_limit == 0 {
            return Err(Error::config("packing.token_limit must be positive"));
        }
        if self.processing.parallel_files == Some(0) {
            return Err(Error::config("processing.parallel_files must be positive"));
        }
        Ok(())
    }
}

/// Tokenizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Path to a HuggingFace `tokenizer.json`; `None` uses the length heuristic
    pub path: Option<PathBuf>,
    /// Characters per token for the length heuristic
    pub chars_per_token: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            path: None,
            chars_per_token: DEFAULT_CHARS_PER_TOKEN,
        }
    }
}

/// Directory discovery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Only keep files ending with one of these suffixes (empty keeps all)
    pub required_exts: Vec<String>,
    /// Extra ignore patterns (gitignore-style globs)
    pub ignore_patterns: Vec<String>,
    /// Read `.serveignore` or `.gitignore` from the root
    pub use_ignore_files: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            required_exts: Vec::new(),
            ignore_patterns: Vec::new(),
            use_ignore_files: true,
        }
    }
}

/// Batch processing configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Number of parallel file workers (default: CPU count)
    pub parallel_files: Option<usize>,
}

impl ProcessingConfig {
    /// Worker count after applying the CPU-count default
    pub fn worker_count(&self) -> usize {
        self.parallel_files.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Token-budget packing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingConfig {
    /// Token budget per packed document
    pub token_limit: usize,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            token_limit: 100_000,
        }
    }
}
