//! Executor configuration loading.
//!
//! Reads `ExecutorConfig` from a TOML file. A missing file is not an error:
//! every field has a default, so deployments only write what they change.

use std::path::Path;

use rebound_types::config::ExecutorConfig;
use tracing::debug;

use crate::error::ConfigError;

/// Load executor configuration from `path`, falling back to defaults when
/// the file does not exist.
pub fn load_executor_config(path: &Path) -> Result<ExecutorConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No executor config file, using defaults");
            return Ok(ExecutorConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
