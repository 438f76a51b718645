use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::identifier::StrategyKind;
use crate::remote::WriteMode;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub dhis2: Dhis2Config,
    #[serde(default)]
    pub identifier: IdentifierConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Deserialize)]
pub struct Dhis2Config {
    /// Instance root, e.g. "https://play.dhis2.org/40.4.0"
    pub base_url: String,
    /// Basic auth user
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Personal access token, takes precedence over basic auth
    #[serde(default)]
    pub api_token: Option<String>,
    /// Data store namespace the records are written to
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

// Credentials never go to the logs.
impl std::fmt::Debug for Dhis2Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dhis2Config")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("namespace", &self.namespace)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn default_namespace() -> String {
    "trainingAttendants".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdentifierConfig {
    /// "local" (UUID minted here) or "remote" (DHIS2 system/id)
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Length of the upper-case display code cut from a local UUID
    #[serde(default)]
    pub short_code_len: Option<usize>,
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Remote,
            short_code_len: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionConfig {
    /// "create" (POST, key must not exist) or "update" (PUT, key must exist)
    #[serde(default)]
    pub write_mode: WriteMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the roster cache; platform data dir when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Single key the roster is stored under
    #[serde(default = "default_cache_key")]
    pub key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_cache_key(),
        }
    }
}

fn default_cache_key() -> String {
    "trainingAttendants.roster".to_string()
}

impl CacheConfig {
    /// Resolve the cache directory, falling back to `<data dir>/attendant-registry`.
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        self.dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("attendant-registry")))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily rolling log files
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("dhis2.base_url", "http://localhost:8080")?
            .set_default("dhis2.namespace", default_namespace())?
            .set_default("dhis2.timeout_ms", default_timeout_ms())?
            .set_default("identifier.strategy", "remote")?
            .set_default("submission.write_mode", "create")?
            .set_default("cache.key", default_cache_key())?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("ATTENDANT_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (ATTENDANT__DHIS2__BASE_URL, etc.)
            .add_source(
                Environment::with_prefix("ATTENDANT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if url::Url::parse(&self.dhis2.base_url).is_err() {
            errors.push(format!("dhis2.base_url is not a valid URL: {}", self.dhis2.base_url));
        }

        if self.dhis2.namespace.trim().is_empty() {
            errors.push("dhis2.namespace must not be empty".to_string());
        }

        if self.dhis2.timeout_ms == 0 {
            errors.push("dhis2.timeout_ms must be positive".to_string());
        }

        if self.dhis2.api_token.is_none()
            && self.dhis2.username.is_some() != self.dhis2.password.is_some()
        {
            errors.push("dhis2.username and dhis2.password must be set together".to_string());
        }

        if let Some(len) = self.identifier.short_code_len {
            if !(1..=32).contains(&len) {
                errors.push(format!(
                    "identifier.short_code_len must be between 1 and 32, got {len}"
                ));
            }
        }

        if self.cache.key.trim().is_empty() {
            errors.push("cache.key must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            dhis2: Dhis2Config {
                base_url: "https://dhis2.example.org".to_string(),
                username: Some("admin".to_string()),
                password: Some("district".to_string()),
                api_token: None,
                namespace: default_namespace(),
                timeout_ms: 5000,
            },
            identifier: IdentifierConfig::default(),
            submission: SubmissionConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn sample_config_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_collects_every_problem() {
        let mut cfg = sample();
        cfg.dhis2.base_url = "not a url".to_string();
        cfg.dhis2.password = None;
        cfg.identifier.short_code_len = Some(40);

        let errors = cfg.validate().unwrap_err();
        assert_eq!(errors.len(), 3, "{errors:?}");
    }

    #[test]
    fn debug_redacts_credentials() {
        let rendered = format!("{:?}", sample().dhis2);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("district"));
    }

    #[test]
    fn load_from_empty_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(cfg.dhis2.namespace, "trainingAttendants");
        assert_eq!(cfg.identifier.strategy, StrategyKind::Remote);
        assert_eq!(cfg.submission.write_mode, WriteMode::Create);
        assert_eq!(cfg.cache.key, "trainingAttendants.roster");
    }

    #[test]
    fn load_from_reads_default_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            r#"
[dhis2]
base_url = "https://dhis2.example.org"
namespace = "courses"

[identifier]
strategy = "local"
short_code_len = 6

[submission]
write_mode = "update"
"#,
        )
        .unwrap();

        let cfg = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(cfg.dhis2.base_url, "https://dhis2.example.org");
        assert_eq!(cfg.dhis2.namespace, "courses");
        assert_eq!(cfg.identifier.strategy, StrategyKind::Local);
        assert_eq!(cfg.identifier.short_code_len, Some(6));
        assert_eq!(cfg.submission.write_mode, WriteMode::Update);
    }
}
