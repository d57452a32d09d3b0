//! Process configuration: model credentials, sampling settings, HTTP surface.
//!
//! Layered lowest to highest: built-in defaults, an optional YAML file,
//! then environment variables (`.env` is loaded into the environment by
//! [`load_dotenv`] before this runs). Loaded once at startup and never mutated.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::llm::types::DEFAULT_MODEL;

pub const DEFAULT_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

const ENV_API_KEY: &str = "HF_TOKEN";
const ENV_MODEL: &str = "HF_MODEL";
const ENV_BASE_URL: &str = "HF_BASE_URL";
const ENV_TEMPERATURE: &str = "HF_TEMPERATURE";
const ENV_MAX_TOKENS: &str = "HF_MAX_TOKENS";
const ENV_TIMEOUT: &str = "WEBAGENT_TIMEOUT_SECS";
const ENV_MAX_RETRIES: &str = "WEBAGENT_MAX_RETRIES";
const ENV_BIND: &str = "WEBAGENT_BIND";
const ENV_ORIGINS: &str = "WEBAGENT_ALLOWED_ORIGINS";

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: set {0} in the environment or .env file")]
    MissingVar(&'static str),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),
}

/// Load a `.env` file into the process environment.
///
/// With no `path`, searches the working directory and its parents. A missing
/// file is fine; an unreadable or malformed one is an error. Returns the path
/// that was loaded, if any.
pub fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    let loaded = match path {
        Some(p) => dotenvy::from_path(p).map(|()| p.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match loaded {
        Ok(p) => Ok(Some(p)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Resolved process configuration.
#[derive(Clone)]
pub struct Config {
    /// Model-access credential. Redacted from `Debug`.
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Wall-clock budget for one agent execution.
    pub request_timeout_secs: u64,
    /// Retries on HTTP 429 before a stage fails.
    pub max_retries: u32,
    pub bind: String,
    pub allowed_origins: Vec<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("bind", &self.bind)
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}

/// YAML file shape. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    request_timeout_secs: Option<u64>,
    max_retries: Option<u32>,
    bind: Option<String>,
    allowed_origins: Option<Vec<String>>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&text)?)
    }
}

impl Config {
    /// Load from an optional YAML file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => FileConfig::read(p)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge file values with an environment lookup. Environment wins.
    fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let api_key = env(ENV_API_KEY)
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_KEY))?;

        let allowed_origins = match env(ENV_ORIGINS) {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => file
                .allowed_origins
                .unwrap_or_else(|| vec![DEFAULT_ORIGIN.to_string()]),
        };

        let temperature = parse_or(&env, ENV_TEMPERATURE, file.temperature, 0.7)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue {
                key: ENV_TEMPERATURE,
                value: temperature.to_string(),
            });
        }

        Ok(Self {
            api_key,
            model: env(ENV_MODEL)
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: env(ENV_BASE_URL)
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature,
            max_tokens: parse_or(&env, ENV_MAX_TOKENS, file.max_tokens, 512)?,
            request_timeout_secs: parse_or(&env, ENV_TIMEOUT, file.request_timeout_secs, 120)?,
            max_retries: parse_or(&env, ENV_MAX_RETRIES, file.max_retries, 2)?,
            bind: env(ENV_BIND)
                .or(file.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            allowed_origins,
        })
    }

    /// Minimal valid configuration for unit tests.
    #[cfg(test)]
    pub(crate) fn for_tests(api_key: &str) -> Self {
        Self::resolve(FileConfig::default(), |key| {
            (key == ENV_API_KEY).then(|| api_key.to_string())
        })
        .unwrap()
    }
}

/// Parse an environment value, falling back to the file value, then the default.
fn parse_or<T: std::str::FromStr>(
    env: impl Fn(&str) -> Option<String>,
    key: &'static str,
    file_value: Option<T>,
    default: T,
) -> Result<T, ConfigError> {
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(file_value.unwrap_or(default)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_with_only_token() {
        let config =
            Config::resolve(FileConfig::default(), env_of(&[("HF_TOKEN", "hf_x")])).unwrap();
        assert_eq!(config.api_key, "hf_x");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.allowed_origins, vec![DEFAULT_ORIGIN.to_string()]);
    }

    #[test]
    fn missing_token_is_fatal() {
        let err = Config::resolve(FileConfig::default(), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar("HF_TOKEN")));
        assert!(err.to_string().contains("HF_TOKEN"));

        let err =
            Config::resolve(FileConfig::default(), env_of(&[("HF_TOKEN", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }

    #[test]
    fn env_overrides_file() {
        let file = FileConfig {
            api_key: Some("from-file".into()),
            model: Some("file/model".into()),
            max_tokens: Some(256),
            ..Default::default()
        };
        let config = Config::resolve(
            file,
            env_of(&[
                ("HF_MODEL", "env/model"),
                ("WEBAGENT_ALLOWED_ORIGINS", "http://a, http://b,"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.model, "env/model");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.allowed_origins, vec!["http://a", "http://b"]);
    }

    #[test]
    fn invalid_number_rejected() {
        let err = Config::resolve(
            FileConfig::default(),
            env_of(&[("HF_TOKEN", "k"), ("HF_MAX_TOKENS", "lots")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("HF_MAX_TOKENS"));

        let err = Config::resolve(
            FileConfig::default(),
            env_of(&[("HF_TOKEN", "k"), ("HF_TEMPERATURE", "9.5")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "HF_TEMPERATURE",
                ..
            }
        ));
    }

    #[test]
    fn reads_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api_key: hf_yaml\nmodel: huggingface/llama-70b\ntemperature: 0.2\n\
             allowed_origins:\n  - https://app.example.com"
        )
        .unwrap();

        let parsed = FileConfig::read(file.path()).unwrap();
        let config = Config::resolve(parsed, env_of(&[])).unwrap();
        assert_eq!(config.api_key, "hf_yaml");
        assert_eq!(config.model, "huggingface/llama-70b");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.allowed_origins, vec!["https://app.example.com"]);
    }

    #[test]
    fn unknown_yaml_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_kee: typo").unwrap();
        let err = FileConfig::read(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load(Some(Path::new("/nonexistent/webagent.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn missing_dotenv_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_dotenv(Some(&dir.path().join(".env"))).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn dotenv_values_reach_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "WEBAGENT_DOTENV_LOADED=yes").unwrap();

        let loaded = load_dotenv(Some(file.path())).unwrap();
        assert_eq!(loaded.as_deref(), Some(file.path()));
        assert_eq!(std::env::var("WEBAGENT_DOTENV_LOADED").unwrap(), "yes");
    }

    #[test]
    fn malformed_dotenv_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "WEBAGENT_DOTENV_BROKEN='unterminated").unwrap();

        let err = load_dotenv(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::DotEnv(_)));
        assert!(err.to_string().contains(".env"));
    }

    #[test]
    fn debug_redacts_key() {
        let config = Config::for_tests("hf_very_secret");
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("hf_very_secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
