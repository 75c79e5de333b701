//! Configuration for SenderNews

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "SENDERNEWS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Sender.net API configuration
    #[serde(default)]
    pub sender: SenderConfig,

    /// Publish event configuration
    #[serde(default)]
    pub publish: PublishConfig,

    /// Credential vault configuration
    #[serde(default)]
    pub vault: VaultConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sender.net API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderConfig {
    /// API base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Where administrators obtain a new API token
    #[serde(default = "default_token_help_url")]
    pub token_help_url: String,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            token_help_url: default_token_help_url(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.sender.net/v2".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_token_help_url() -> String {
    "https://app.sender.net/settings/tokens".to_string()
}

/// Publish event configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Content type whose publication creates a campaign
    #[serde(default = "default_target_post_type")]
    pub target_post_type: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            target_post_type: default_target_post_type(),
        }
    }
}

fn default_target_post_type() -> String {
    "post".to_string()
}

/// Credential vault configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Name of the environment variable holding the process-wide secret
    #[serde(default = "default_secret_env")]
    pub secret_env: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            secret_env: default_secret_env(),
        }
    }
}

fn default_secret_env() -> String {
    "SENDERNEWS_SECRET_KEY".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "json" or "text"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from an optional file, overridden by
    /// `SENDERNEWS__SECTION__KEY` environment variables
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Config::load`], reading overrides from `env` instead of the
    /// process environment when given
    fn load_with_env(
        path: Option<&Path>,
        env: Option<::config::Map<String, String>>,
    ) -> crate::Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            debug!("Loading configuration file {}", path.display());
            builder = builder.add_source(
                ::config::File::from(path.to_path_buf())
                    .format(::config::FileFormat::Toml)
                    .required(true),
            );
        }

        builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Config>())
            .map_err(|e| crate::Error::Config(format!("Failed to load config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sender.base_url, "https://api.sender.net/v2");
        assert_eq!(config.sender.timeout_secs, 10);
        assert_eq!(config.publish.target_post_type, "post");
        assert_eq!(config.vault.secret_env, "SENDERNEWS_SECRET_KEY");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[sender]
base_url = "https://sender.test/v2"
timeout_secs = 3

[publish]
target_post_type = "news"

[logging]
format = "text"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sender.base_url, "https://sender.test/v2");
        assert_eq!(config.sender.timeout_secs, 3);
        assert_eq!(config.sender.token_help_url, "https://app.sender.net/settings/tokens");
        assert_eq!(config.publish.target_post_type, "news");
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_env_override() {
        let env = ::config::Map::from([
            (
                "SENDERNEWS__PUBLISH__TARGET_POST_TYPE".to_string(),
                "article".to_string(),
            ),
            ("SENDERNEWS__SENDER__TIMEOUT_SECS".to_string(), "30".to_string()),
            ("OTHER__PUBLISH__TARGET_POST_TYPE".to_string(), "page".to_string()),
        ]);
        let config = Config::load_with_env(None, Some(env)).unwrap();

        assert_eq!(config.publish.target_post_type, "article");
        assert_eq!(config.sender.timeout_secs, 30);
        assert_eq!(config.sender.base_url, "https://api.sender.net/v2");
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file(Path::new("/nonexistent/sendernews.toml")).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
