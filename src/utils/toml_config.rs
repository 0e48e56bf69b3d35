//! TOML-based configuration for Storegate
//!
//! This module provides declarative configuration for the server, the
//! session/auth settings and the database via a TOML file (`storegate.toml`).
//!
//! Secrets are never written in the file. The `[auth]` section names the
//! environment variable that holds the signing secret, which is resolved
//! once at startup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Minimum accepted length of the token signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted session lifetime: ten years.
pub const MAX_TOKEN_TTL_HOURS: i64 = 10 * 365 * 24;

/// Root configuration structure loaded from storegate.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoregateConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the token signing secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    /// Reject tokens that are no longer in the session registry
    #[serde(default = "default_true")]
    pub enforce_revocation: bool,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_true() -> bool {
    true
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            token_ttl_hours: default_token_ttl_hours(),
            enforce_revocation: true,
        }
    }
}

impl AuthConfig {
    /// Token validity in seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_hours.saturating_mul(60 * 60)
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Upper bound on any single store call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_database_url() -> String {
    "./data/storegate.db".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl StoregateConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: StoregateConfig = toml::from_str(content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate value ranges and the availability of the signing secret
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::ValidationError(
                "auth.token_ttl_hours must be positive".to_string(),
            ));
        }

        if self.auth.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_ttl_hours must be at most {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }

        if self.database.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "database.timeout_secs must be positive".to_string(),
            ));
        }

        let secret = self.jwt_secret()?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ValidationError(format!(
                "secret in '{}' must be at least {} bytes",
                self.auth.jwt_secret_env, MIN_SECRET_LEN
            )));
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Get the token signing secret from the environment
    pub fn jwt_secret(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.jwt_secret_env)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.jwt_secret_env.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GOOD_SECRET: &str = "test-secret-at-least-32-characters-long";

    fn create_test_config() -> String {
        r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"
log_format = "json"

[auth]
jwt_secret_env = "STOREGATE_TEST_SECRET"
token_ttl_hours = 12
enforce_revocation = false

[database]
url = ":memory:"
timeout_secs = 2
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        temp_env::with_var("STOREGATE_TEST_SECRET", Some(GOOD_SECRET), || {
            let config =
                StoregateConfig::from_toml_str(&create_test_config()).expect("should parse");

            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.server.log_format, LogFormat::Json);
            assert_eq!(config.auth.token_ttl_secs(), 12 * 3600);
            assert!(!config.auth.enforce_revocation);
            assert_eq!(config.database.timeout(), Duration::from_secs(2));
            assert_eq!(config.jwt_secret().expect("secret"), GOOD_SECRET);
        });
    }

    #[test]
    fn test_defaults() {
        temp_env::with_var("JWT_SECRET", Some(GOOD_SECRET), || {
            let config = StoregateConfig::from_toml_str("").expect("empty file uses defaults");

            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.server.log_level, "info");
            assert_eq!(config.server.log_format, LogFormat::Text);
            assert_eq!(config.auth.jwt_secret_env, "JWT_SECRET");
            assert_eq!(config.auth.token_ttl_hours, 24);
            assert!(config.auth.enforce_revocation);
            assert_eq!(config.database.url, "./data/storegate.db");
            assert_eq!(config.database.timeout_secs, 5);
        });
    }

    #[test]
    fn test_missing_secret_env() {
        temp_env::with_var_unset("STOREGATE_TEST_SECRET", || {
            let result = StoregateConfig::from_toml_str(&create_test_config());
            assert!(matches!(result, Err(ConfigError::MissingEnvVar(name)) if name == "STOREGATE_TEST_SECRET"));
        });
    }

    #[test]
    fn test_short_secret_rejected() {
        temp_env::with_var("STOREGATE_TEST_SECRET", Some("too-short"), || {
            let result = StoregateConfig::from_toml_str(&create_test_config());
            assert!(matches!(result, Err(ConfigError::ValidationError(_))));
        });
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        temp_env::with_var("JWT_SECRET", Some(GOOD_SECRET), || {
            let result = StoregateConfig::from_toml_str("[auth]\ntoken_ttl_hours = 0\n");
            assert!(matches!(result, Err(ConfigError::ValidationError(_))));
        });
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        temp_env::with_var("JWT_SECRET", Some(GOOD_SECRET), || {
            let result = StoregateConfig::from_toml_str("[auth]\ntoken_ttl_hours = 100000000000\n");
            assert!(matches!(result, Err(ConfigError::ValidationError(_))));

            let at_limit = format!("[auth]\ntoken_ttl_hours = {}\n", MAX_TOKEN_TTL_HOURS);
            assert!(StoregateConfig::from_toml_str(&at_limit).is_ok());
        });
    }

    #[test]
    fn test_ttl_secs_saturates() {
        let auth = AuthConfig {
            token_ttl_hours: i64::MAX,
            ..AuthConfig::default()
        };
        assert_eq!(auth.token_ttl_secs(), i64::MAX);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        temp_env::with_var("JWT_SECRET", Some(GOOD_SECRET), || {
            let result = StoregateConfig::from_toml_str("[database]\ntimeout_secs = 0\n");
            assert!(matches!(result, Err(ConfigError::ValidationError(_))));
        });
    }

    #[test]
    fn test_invalid_toml() {
        let result = StoregateConfig::from_toml_str("[server\nport = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = StoregateConfig::load("/definitely/not/here/storegate.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(create_test_config().as_bytes())
            .expect("write config");

        temp_env::with_var("STOREGATE_TEST_SECRET", Some(GOOD_SECRET), || {
            let config = StoregateConfig::load(file.path()).expect("should load");
            assert_eq!(config.server.port, 8080);
        });
    }
}
