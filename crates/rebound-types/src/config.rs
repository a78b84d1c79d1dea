//! Executor configuration types for Rebound.
//!
//! `ExecutorConfig` represents the `executor.toml` that controls context
//! overflow recovery and request-to-run mapping. All fields have sensible
//! defaults.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the agent executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Compact the session and retry once when the run overflows the
    /// model's context window.
    #[serde(default = "default_retry_on_context_overflow")]
    pub retry_on_context_overflow: bool,

    /// Additional phrases that identify a context-window error, for
    /// backends whose wording the built-in list does not cover.
    #[serde(default)]
    pub extra_context_window_markers: Vec<String>,

    /// Prefix for user ids derived from the request's context id.
    #[serde(default = "default_user_id_prefix")]
    pub user_id_prefix: String,
}

fn default_retry_on_context_overflow() -> bool {
    true
}

fn default_user_id_prefix() -> String {
    "A2A_USER_".to_string()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            retry_on_context_overflow: default_retry_on_context_overflow(),
            extra_context_window_markers: Vec::new(),
            user_id_prefix: default_user_id_prefix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_config_default_values() {
        let config = ExecutorConfig::default();
        assert!(config.retry_on_context_overflow);
        assert!(config.extra_context_window_markers.is_empty());
        assert_eq!(config.user_id_prefix, "A2A_USER_");
    }

    #[test]
    fn test_executor_config_deserialize_with_defaults() {
        let config: ExecutorConfig = toml::from_str("").unwrap();
        assert_eq!(config, ExecutorConfig::default());
    }

    #[test]
    fn test_executor_config_deserialize_with_values() {
        let toml_str = r#"
retry_on_context_overflow = false
extra_context_window_markers = ["token limit reached"]
user_id_prefix = "remote-"
"#;
        let config: ExecutorConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.retry_on_context_overflow);
        assert_eq!(config.extra_context_window_markers, vec!["token limit reached"]);
        assert_eq!(config.user_id_prefix, "remote-");
    }
}
