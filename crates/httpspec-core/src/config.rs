//! Project configuration for test runs

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Project configuration, read from `.httpspec.toml` when present.
///
/// Everything is optional; command-line flags and the `HTTP_THREAD_COUNT`
/// environment variable take precedence over the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Worker thread count for the file pool.
    #[serde(default)]
    pub threads: Option<usize>,

    /// Per-request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from the default locations; no file means default values.
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = [".httpspec.toml", "httpspec.toml"];

        for name in candidates {
            let path = Path::new(name);
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    /// Create example config file
    pub fn example() -> &'static str {
        r#"# httpspec configuration

# Worker thread count (overridden by --threads or HTTP_THREAD_COUNT)
# threads = 4

# Per-request timeout in seconds (overridden by --timeout)
# timeout_secs = 10
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
