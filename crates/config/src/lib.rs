//! Configuration loading, validation, and management for the SAIA chain.
//!
//! Loads configuration from `~/.saiachain/config.toml`, then applies
//! environment variable overrides. Everything is resolved once at startup
//! and handed to the assembler and executor as a plain value.

use saiachain_core::model::ChatModelSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Credential for the model proxy and the assistant service.
pub const ENV_API_KEY: &str = "SAIA_API_KEY";
/// Base URI of the OpenAI-compatible model proxy.
pub const ENV_PROXY_URI: &str = "SAIA_PROXY_URI";
/// Base URI of the assistant service.
pub const ENV_ASSISTANT_API: &str = "SAIA_API_ASSISTANT";
/// `"true"` turns on chain verbosity.
pub const ENV_DEBUG: &str = "DEBUG";

/// The root configuration structure.
///
/// Maps directly to `~/.saiachain/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct SaiaConfig {
    /// API key shared by the model proxy and the assistant service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URI of the model proxy
    #[serde(default = "default_proxy_uri")]
    pub proxy_uri: String,

    /// Base URI of the assistant service (`/assistant/chat` is appended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_api_url: Option<String>,

    /// Verbose chain logging
    #[serde(default)]
    pub debug: bool,

    /// Local chat model settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Chain defaults
    #[serde(default)]
    pub chain: ChainConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_proxy_uri() -> String {
    "https://api.qa.saia.ai/proxy/openai/v1".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for SaiaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaiaConfig")
            .field("api_key", &redact(&self.api_key))
            .field("proxy_uri", &self.proxy_uri)
            .field("assistant_api_url", &self.assistant_api_url)
            .field("debug", &self.debug)
            .field("model", &self.model)
            .field("chain", &self.chain)
            .field("http", &self.http)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_name")]
    pub model_name: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_true")]
    pub streaming: bool,
}

fn default_model_name() -> String {
    "gpt-3.5-turbo-16k".into()
}
fn default_temperature() -> f32 {
    0.5
}
fn default_true() -> bool {
    true
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            temperature: default_temperature(),
            streaming: true,
        }
    }
}

impl ModelConfig {
    pub fn settings(&self) -> ChatModelSettings {
        ChatModelSettings {
            model_name: self.model_name.clone(),
            temperature: self.temperature,
            streaming: self.streaming,
        }
    }
}

/// Which path produces a turn's reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainMode {
    /// The assistant service answers (default).
    #[default]
    Remote,
    /// The locally assembled chain answers through the chat model.
    Local,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Assistant to address when the host does not pick one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<String>,

    /// Text prepended to the default system instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_message: Option<String>,

    /// History-slot name for the CLI's buffer memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_key: Option<String>,

    #[serde(default)]
    pub mode: ChainMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Client-side timeout applied by the HTTP transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SaiaConfig {
    /// Load configuration from the default path (~/.saiachain/config.toml)
    /// and apply process environment overrides:
    /// - `SAIA_API_KEY`
    /// - `SAIA_PROXY_URI`
    /// - `SAIA_API_ASSISTANT`
    /// - `DEBUG`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path. No environment lookup.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup. Environment wins over file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(uri) = lookup(ENV_PROXY_URI).filter(|v| !v.is_empty()) {
            self.proxy_uri = uri;
        }
        if let Some(url) = lookup(ENV_ASSISTANT_API).filter(|v| !v.is_empty()) {
            self.assistant_api_url = Some(url);
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            self.debug = debug == "true";
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".saiachain")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::ValidationError(
                "model.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !is_http_uri(&self.proxy_uri) {
            return Err(ConfigError::ValidationError(format!(
                "proxy_uri must be an http(s) URI, got '{}'",
                self.proxy_uri
            )));
        }

        if let Some(url) = &self.assistant_api_url {
            if !is_http_uri(url) {
                return Err(ConfigError::ValidationError(format!(
                    "assistant_api_url must be an http(s) URI, got '{url}'"
                )));
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "http.timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// The API key, or an error naming the variable that should provide it.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing(ENV_API_KEY))
    }

    /// `<assistant base>/assistant/chat`.
    pub fn assistant_chat_url(&self) -> Result<String, ConfigError> {
        Ok(format!("{}/assistant/chat", self.assistant_base()?))
    }

    /// `<assistant base>/assistants`.
    pub fn assistant_catalog_url(&self) -> Result<String, ConfigError> {
        Ok(format!("{}/assistants", self.assistant_base()?))
    }

    fn assistant_base(&self) -> Result<&str, ConfigError> {
        self.assistant_api_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .ok_or(ConfigError::Missing(ENV_ASSISTANT_API))
    }

    /// Generate a default config TOML string (for the `config` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for SaiaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            proxy_uri: default_proxy_uri(),
            assistant_api_url: None,
            debug: false,
            model: ModelConfig::default(),
            chain: ChainConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

fn is_http_uri(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("{0} is not set")]
    Missing(&'static str),
}

impl From<ConfigError> for saiachain_core::Error {
    fn from(err: ConfigError) -> Self {
        saiachain_core::Error::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = SaiaConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.proxy_uri, "https://api.qa.saia.ai/proxy/openai/v1");
        assert_eq!(config.model.model_name, "gpt-3.5-turbo-16k");
        assert!((config.model.temperature - 0.5).abs() < f32::EPSILON);
        assert!(config.model.streaming);
        assert_eq!(config.chain.mode, ChainMode::Remote);
        assert!(!config.debug);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = SaiaConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: SaiaConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.proxy_uri, config.proxy_uri);
        assert_eq!(parsed.http.timeout_secs, 120);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = SaiaConfig {
            api_key: Some("from-file".into()),
            ..SaiaConfig::default()
        };
        config.apply_env(env(&[
            (ENV_API_KEY, "from-env"),
            (ENV_PROXY_URI, "http://localhost:9000/v1"),
            (ENV_ASSISTANT_API, "https://assistants.example.com/v1/"),
            (ENV_DEBUG, "true"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.proxy_uri, "http://localhost:9000/v1");
        assert!(config.debug);
        assert_eq!(
            config.assistant_chat_url().unwrap(),
            "https://assistants.example.com/v1/assistant/chat"
        );
    }

    #[test]
    fn debug_flag_requires_literal_true() {
        let mut config = SaiaConfig::default();
        config.apply_env(env(&[(ENV_DEBUG, "1")]));
        assert!(!config.debug);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = SaiaConfig::default();
        config.apply_env(env(&[(ENV_API_KEY, ""), (ENV_PROXY_URI, "")]));
        assert!(config.api_key.is_none());
        assert_eq!(config.proxy_uri, default_proxy_uri());
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = SaiaConfig {
            model: ModelConfig {
                temperature: 5.0,
                ..ModelConfig::default()
            },
            ..SaiaConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_proxy_uri_rejected() {
        let config = SaiaConfig {
            proxy_uri: "api.qa.saia.ai".into(),
            ..SaiaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn missing_values_name_their_variable() {
        let config = SaiaConfig::default();
        let err = config.require_api_key().unwrap_err();
        assert_eq!(err.to_string(), "SAIA_API_KEY is not set");
        let err = config.assistant_chat_url().unwrap_err();
        assert_eq!(err.to_string(), "SAIA_API_ASSISTANT is not set");
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = SaiaConfig {
            api_key: Some("super-secret".into()),
            ..SaiaConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = SaiaConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.proxy_uri, default_proxy_uri());
    }

    #[test]
    fn loads_file_with_chain_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
assistant_api_url = "https://assistants.example.com"

[model]
temperature = 0.2
streaming = false

[chain]
assistant = "ContractComparer"
system_message = "Be terse."
mode = "local"
"#
        )
        .unwrap();

        let config = SaiaConfig::load_from(file.path()).unwrap();
        assert_eq!(config.chain.assistant.as_deref(), Some("ContractComparer"));
        assert_eq!(config.chain.system_message.as_deref(), Some("Be terse."));
        assert_eq!(config.chain.mode, ChainMode::Local);
        assert!(!config.model.streaming);
        assert_eq!(config.model.model_name, "gpt-3.5-turbo-16k");
        assert_eq!(
            config.assistant_catalog_url().unwrap(),
            "https://assistants.example.com/assistants"
        );
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "proxy_uri = [not toml").unwrap();
        assert!(matches!(
            SaiaConfig::load_from(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn config_error_converts_to_core_config_error() {
        let err: saiachain_core::Error = ConfigError::Missing(ENV_API_KEY).into();
        assert!(matches!(err, saiachain_core::Error::Config { .. }));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = SaiaConfig::default_toml();
        assert!(toml_str.contains("gpt-3.5-turbo-16k"));
        assert!(toml_str.contains("api.qa.saia.ai"));
    }
}
