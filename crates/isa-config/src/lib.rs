//! Configuration management for ISA.
//!
//! Parses `isa.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `commons.api_url`
//! - `commons.consumer_key`
//! - `commons.consumer_secret`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the simulation toggle.
    pub simulate: Option<bool>,
    /// Override the SQLite database path.
    pub database_path: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "isa.toml";

/// Default Action API endpoint.
const DEFAULT_API_URL: &str = "https://commons.wikimedia.org/w/api.php";

/// Upper bound for the per-request timeout.
const MAX_TIMEOUT_SECS: u64 = 300;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Remote platform configuration.
    pub commons: CommonsConfig,
    /// Local database configuration (path is a relative string from TOML).
    database: DatabaseConfigRaw,
    /// Submission behaviour.
    pub submission: SubmissionConfig,

    /// Resolved database configuration (set after loading).
    #[serde(skip)]
    pub database_resolved: DatabaseConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5000,
        }
    }
}

/// Remote platform (MediaWiki Action API) configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommonsConfig {
    /// Action API endpoint (`.../w/api.php`).
    pub api_url: String,
    /// OAuth consumer key.
    pub consumer_key: String,
    /// OAuth consumer secret (HMAC-SHA1 consumers).
    pub consumer_secret: Option<String>,
    /// RSA private key for RSA-SHA1 consumers, relative to the config file.
    pub private_key_file: Option<PathBuf>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for CommonsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            consumer_key: String::new(),
            consumer_secret: None,
            private_key_file: None,
            timeout_secs: 30,
            user_agent: concat!("ISA/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl CommonsConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate that the consumer credentials are usable for live edits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.api_url, "commons.api_url")?;
        require_http_url(&self.api_url, "commons.api_url")?;
        require_non_empty(&self.consumer_key, "commons.consumer_key")?;
        match (&self.consumer_secret, &self.private_key_file) {
            (Some(secret), None) => require_non_empty(secret, "commons.consumer_secret"),
            (None, Some(_)) => Ok(()),
            (Some(_), Some(_)) => Err(ConfigError::Validation(
                "commons.consumer_secret and commons.private_key_file are mutually exclusive"
                    .to_owned(),
            )),
            (None, None) => Err(ConfigError::Validation(
                "commons.consumer_secret or commons.private_key_file is required".to_owned(),
            )),
        }
    }
}

/// Raw database configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DatabaseConfigRaw {
    path: Option<String>,
}

/// Resolved database configuration with an absolute path.
#[derive(Debug, Default)]
pub struct DatabaseConfig {
    /// SQLite database file.
    pub path: PathBuf,
}

/// Submission configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Replace remote calls with a deterministic stub.
    pub simulate: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`commons.consumer_secret`").
        field: String,
        /// Error message (e.g., "${`ISA_CONSUMER_SECRET`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `isa.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(simulate) = settings.simulate {
            self.submission.simulate = simulate;
        }
        if let Some(path) = &settings.database_path {
            self.database_resolved.path.clone_from(path);
        }
    }

    /// Get validated platform configuration.
    ///
    /// Use this instead of accessing the `commons` field directly when the
    /// command performs live edits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the consumer credentials are missing or invalid.
    pub fn require_commons(&self) -> Result<&CommonsConfig, ConfigError> {
        self.commons.validate()?;
        Ok(&self.commons)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            commons: CommonsConfig::default(),
            database: DatabaseConfigRaw::default(),
            submission: SubmissionConfig::default(),
            database_resolved: DatabaseConfig {
                path: base.join(".isa").join("isa.db"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file. Consumer credentials are
    /// not checked here; see [`Config::require_commons`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_commons_transport()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_commons_transport(&self) -> Result<(), ConfigError> {
        require_http_url(&self.commons.api_url, "commons.api_url")?;

        let timeout = self.commons.timeout_secs;
        if timeout == 0 {
            return Err(ConfigError::Validation(
                "commons.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if timeout > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "commons.timeout_secs cannot exceed {MAX_TIMEOUT_SECS}"
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        let commons = &mut self.commons;
        commons.api_url = expand::expand_env(&commons.api_url, "commons.api_url")?;
        commons.consumer_key = expand::expand_env(&commons.consumer_key, "commons.consumer_key")?;
        if let Some(ref secret) = commons.consumer_secret {
            commons.consumer_secret =
                Some(expand::expand_env(secret, "commons.consumer_secret")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.database_resolved = DatabaseConfig {
            path: config_dir.join(self.database.path.as_deref().unwrap_or(".isa/isa.db")),
        };

        if let Some(key_file) = &self.commons.private_key_file {
            self.commons.private_key_file = Some(config_dir.join(key_file));
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.commons.api_url, DEFAULT_API_URL);
        assert_eq!(config.commons.timeout(), Duration::from_secs(30));
        assert_eq!(
            config.database_resolved.path,
            PathBuf::from("/test/.isa/isa.db")
        );
        assert!(!config.submission.simulate);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert!(config.commons.consumer_secret.is_none());
    }

    #[test]
    fn test_parse_commons_config() {
        let toml = r#"
[commons]
api_url = "https://test.wikipedia.org/w/api.php"
consumer_key = "abc"
consumer_secret = "def"
timeout_secs = 10
user_agent = "ISA-test/1.0"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.commons.api_url,
            "https://test.wikipedia.org/w/api.php"
        );
        assert_eq!(config.commons.consumer_key, "abc");
        assert_eq!(config.commons.consumer_secret.as_deref(), Some("def"));
        assert_eq!(config.commons.timeout_secs, 10);
        assert_eq!(config.commons.user_agent, "ISA-test/1.0");
    }

    #[test]
    fn test_parse_submission_simulate() {
        let toml = r"
[submission]
simulate = true
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.submission.simulate);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[database]
path = "data/contributions.db"

[commons]
private_key_file = "keys/consumer.pem"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.database_resolved.path,
            PathBuf::from("/project/data/contributions.db")
        );
        assert_eq!(
            config.commons.private_key_file,
            Some(PathBuf::from("/project/keys/consumer.pem"))
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[server]
port = 8123

[commons]
consumer_key = "key"
consumer_secret = "secret"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 8123);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.database_resolved.path,
            dir.path().join(".isa/isa.db")
        );
        assert!(config.require_commons().is_ok());
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let err = Config::load(Some(Path::new("/nonexistent/isa.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            simulate: Some(true),
            database_path: Some(PathBuf::from("/tmp/isa.db")),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(config.submission.simulate);
        assert_eq!(config.database_resolved.path, PathBuf::from("/tmp/isa.db"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert!(!config.submission.simulate);
    }

    #[test]
    fn test_expand_env_vars_commons() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_ISA_CONSUMER_KEY", "consumer-from-env");
            std::env::set_var("TEST_ISA_CONSUMER_SECRET", "secret-from-env");
        }

        let toml = r#"
[commons]
consumer_key = "${TEST_ISA_CONSUMER_KEY}"
consumer_secret = "${TEST_ISA_CONSUMER_SECRET}"
api_url = "${TEST_ISA_API_URL:-https://commons.wikimedia.org/w/api.php}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.commons.consumer_key, "consumer-from-env");
        assert_eq!(
            config.commons.consumer_secret.as_deref(),
            Some("secret-from-env")
        );
        assert_eq!(config.commons.api_url, DEFAULT_API_URL);

        unsafe {
            std::env::remove_var("TEST_ISA_CONSUMER_KEY");
            std::env::remove_var("TEST_ISA_CONSUMER_SECRET");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_ISA_SECRET_TEST");
        }

        let toml = r#"
[commons]
consumer_key = "key"
consumer_secret = "${MISSING_ISA_SECRET_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("commons.consumer_secret"));
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(result: Result<(), ConfigError>, expected_substrings: &[&str]) {
        let err = result.expect_err("Expected validation to fail");
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    fn valid_commons_config() -> CommonsConfig {
        CommonsConfig {
            consumer_key: "key".to_owned(),
            consumer_secret: Some("secret".to_owned()),
            ..CommonsConfig::default()
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        assert_validation_error(config.validate(), &["server.port"]);
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.commons.timeout_secs = 0;
        assert_validation_error(config.validate(), &["timeout_secs", "greater than 0"]);

        config.commons.timeout_secs = 301;
        assert_validation_error(config.validate(), &["timeout_secs", "300"]);
    }

    #[test]
    fn test_validate_api_url_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.commons.api_url = "ftp://commons.wikimedia.org".to_owned();
        assert_validation_error(config.validate(), &["api_url", "http"]);
    }

    #[test]
    fn test_commons_validate_valid() {
        assert!(valid_commons_config().validate().is_ok());
    }

    #[test]
    fn test_commons_validate_empty_consumer_key() {
        let config = CommonsConfig {
            consumer_key: String::new(),
            ..valid_commons_config()
        };
        assert_validation_error(config.validate(), &["consumer_key", "empty"]);
    }

    #[test]
    fn test_commons_validate_requires_signing_material() {
        let config = CommonsConfig {
            consumer_secret: None,
            ..valid_commons_config()
        };
        assert_validation_error(config.validate(), &["consumer_secret", "private_key_file"]);
    }

    #[test]
    fn test_commons_validate_rejects_both_signing_methods() {
        let config = CommonsConfig {
            private_key_file: Some(PathBuf::from("/keys/consumer.pem")),
            ..valid_commons_config()
        };
        assert_validation_error(config.validate(), &["mutually exclusive"]);
    }

    #[test]
    fn test_require_commons_unconfigured() {
        let config = Config::default_with_base(Path::new("/test"));
        let err = config.require_commons().unwrap_err();
        assert!(err.to_string().contains("consumer_key"));
    }
}
