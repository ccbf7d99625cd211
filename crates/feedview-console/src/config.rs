//! Runtime configuration.
//!
//! Sources, highest precedence first: CLI flags, environment, the TOML
//! file, built-in defaults. The endpoint and bearer token have no
//! compiled-in value.

use std::path::{Path, PathBuf};
use std::time::Duration;

use feedview_shaping::{
    is_valid_timestamp_format, FeedbackKeywords, DEFAULT_LABEL_PREFIX, DEFAULT_TIMESTAMP_FORMAT,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENDPOINT_ENV: &str = "FEEDVIEW_ENDPOINT";
pub const DEFAULT_TOKEN_ENV: &str = "FEEDVIEW_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("No endpoint configured (set [source].endpoint, {ENDPOINT_ENV} or --endpoint)")]
    MissingEndpoint,

    #[error("No bearer token configured (set [source].token or the {0} environment variable)")]
    MissingToken(String),

    #[error("Endpoint must be an http(s) URL, got '{0}'")]
    InvalidEndpoint(String),

    #[error("Invalid timestamp format '{0}'")]
    InvalidTimestampFormat(String),
}

/// `[source]` as written in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub endpoint: Option<String>,
    pub token: Option<String>,
    /// Environment variable consulted for the token.
    pub token_env: String,
    pub timeout_secs: Option<u64>,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            endpoint: None,
            token: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: None,
        }
    }
}

/// `[display]`: presentation settings shared by the console and `dump`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub user_label_prefix: String,
    /// chrono strftime pattern.
    pub timestamp_format: String,
    /// Render timestamps in UTC instead of local time.
    pub utc: bool,
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let keywords = FeedbackKeywords::default();
        Self {
            user_label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc: false,
            positive_keywords: keywords.positive,
            negative_keywords: keywords.negative,
        }
    }
}

impl DisplayConfig {
    pub fn keywords(&self) -> FeedbackKeywords {
        FeedbackKeywords {
            positive: self.positive_keywords.clone(),
            negative: self.negative_keywords.clone(),
        }
    }
}

/// `[console]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub tick_ms: u64,
    /// Console mode logs here; without it logs are discarded.
    pub log_file: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            log_file: None,
        }
    }
}

/// The TOML file as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub source: SourceSection,
    pub display: DisplayConfig,
    pub console: ConsoleConfig,
}

impl FileConfig {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist. A missing default file yields
    /// defaults; nothing is ever written back.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::read(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::read(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("feedview").join("config.toml"))
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub token_env: Option<String>,
}

/// Fully resolved settings for the fetch client.
#[derive(Clone)]
pub struct SourceConfig {
    pub endpoint: String,
    pub token: String,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub display: DisplayConfig,
    pub console: ConsoleConfig,
}

impl AppConfig {
    /// Resolve against the process environment.
    pub fn resolve(file: FileConfig, cli: &CliOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(file, cli, |key| std::env::var(key).ok())
    }

    /// Resolve with an injectable environment lookup.
    pub fn resolve_with<F>(
        file: FileConfig,
        cli: &CliOverrides,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let endpoint = non_empty(cli.endpoint.clone())
            .or_else(|| non_empty(env(ENDPOINT_ENV)))
            .or_else(|| non_empty(file.source.endpoint.clone()))
            .ok_or(ConfigError::MissingEndpoint)?;
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::InvalidEndpoint(endpoint));
        }

        let token_env = cli
            .token_env
            .clone()
            .unwrap_or_else(|| file.source.token_env.clone());
        let token = non_empty(env(&token_env))
            .or_else(|| non_empty(file.source.token.clone()))
            .ok_or_else(|| ConfigError::MissingToken(token_env.clone()))?;

        if !is_valid_timestamp_format(&file.display.timestamp_format) {
            return Err(ConfigError::InvalidTimestampFormat(
                file.display.timestamp_format,
            ));
        }

        Ok(Self {
            source: SourceConfig {
                endpoint,
                token,
                timeout: file.source.timeout_secs.map(Duration::from_secs),
            },
            display: file.display,
            console: file.console,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    fn file_with(endpoint: Option<&str>, token: Option<&str>) -> FileConfig {
        let mut file = FileConfig::default();
        file.source.endpoint = endpoint.map(str::to_string);
        file.source.token = token.map(str::to_string);
        file
    }

    #[test]
    fn test_defaults_parse_from_empty_file() {
        let file = FileConfig::parse("").unwrap();
        assert_eq!(file.source.token_env, DEFAULT_TOKEN_ENV);
        assert_eq!(file.display, DisplayConfig::default());
        assert_eq!(file.console.tick_ms, 100);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let file = FileConfig::parse(
            r#"
            [source]
            endpoint = "https://example.com/data"
            timeout_secs = 15

            [display]
            utc = true
            "#,
        )
        .unwrap();
        assert_eq!(file.source.timeout_secs, Some(15));
        assert!(file.display.utc);
        assert_eq!(file.display.user_label_prefix, "User");
    }

    #[test]
    fn test_resolve_requires_endpoint() {
        let err = AppConfig::resolve_with(
            file_with(None, Some("t")),
            &CliOverrides::default(),
            env_of(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEndpoint));
    }

    #[test]
    fn test_resolve_requires_token() {
        let err = AppConfig::resolve_with(
            file_with(Some("https://example.com"), None),
            &CliOverrides::default(),
            env_of(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken(ref v) if v == DEFAULT_TOKEN_ENV));
    }

    #[test]
    fn test_resolve_rejects_non_http_endpoint() {
        let err = AppConfig::resolve_with(
            file_with(Some("ftp://example.com"), Some("t")),
            &CliOverrides::default(),
            env_of(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let file = file_with(Some("https://file.example"), Some("file-token"));
        let env = env_of(&[
            (ENDPOINT_ENV, "https://env.example"),
            (DEFAULT_TOKEN_ENV, "env-token"),
        ]);

        let cfg = AppConfig::resolve_with(file.clone(), &CliOverrides::default(), &env).unwrap();
        assert_eq!(cfg.source.endpoint, "https://env.example");
        assert_eq!(cfg.source.token, "env-token");

        let cli = CliOverrides {
            endpoint: Some("https://cli.example".into()),
            token_env: None,
        };
        let cfg = AppConfig::resolve_with(file, &cli, &env).unwrap();
        assert_eq!(cfg.source.endpoint, "https://cli.example");
    }

    #[test]
    fn test_custom_token_env() {
        let cli = CliOverrides {
            endpoint: None,
            token_env: Some("DASH_KEY".into()),
        };
        let cfg = AppConfig::resolve_with(
            file_with(Some("https://example.com"), None),
            &cli,
            env_of(&[("DASH_KEY", "k")]),
        )
        .unwrap();
        assert_eq!(cfg.source.token, "k");
    }

    #[test]
    fn test_invalid_timestamp_format_rejected() {
        let mut file = file_with(Some("https://example.com"), Some("t"));
        file.display.timestamp_format = "%Y %!".into();
        let err = AppConfig::resolve_with(file, &CliOverrides::default(), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimestampFormat(_)));
    }

    #[test]
    fn test_debug_hides_token() {
        let cfg = AppConfig::resolve_with(
            file_with(Some("https://example.com"), Some("hunter2")),
            &CliOverrides::default(),
            env_of(&[]),
        )
        .unwrap();
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
