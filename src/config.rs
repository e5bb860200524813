//! Configuration file support
//!
//! ```toml
//! [parser]
//! keep_comments = false
//!
//! [output]
//! format = "json"
//! show_positions = true
//! indent = 2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PplError, Result};
use crate::output::OutputConfig;
use crate::parser::ParserOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parser: ParserOptions,
    pub output: OutputConfig,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Config> {
        toml::from_str(text).map_err(|e| PplError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)
            .map_err(|e| PplError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}
