//! Configuration management
//!
//! Configuration is resolved in this order:
//! 1. Environment variables
//! 2. sa-gateway.toml configuration file
//! 3. Defaults
//!
//! `${VAR_NAME}` inside the configuration file expands to the value of
//! the corresponding environment variable.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// LLM Provider type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Anthropic Claude API
    #[default]
    Claude,
    /// OpenAI-compatible API
    OpenAi,
}

impl LlmProvider {
    fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "openai" | "glm" | "zai" | "minimax" => LlmProvider::OpenAi,
            _ => LlmProvider::Claude,
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key
    pub api_key: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// API provider
    #[serde(default)]
    pub provider: LlmProvider,

    /// Base URL (optional, for custom endpoints)
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            provider: LlmProvider::Claude,
            base_url: None,
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

/// HTTP API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Port for the HTTP API server
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Session time-to-live in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: i64,

    /// Number of recent messages included in the agent context
    #[serde(default = "default_context_window")]
    pub context_window: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            ttl_secs: default_ttl_secs(),
            context_window: default_context_window(),
        }
    }
}

/// Ticker dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path to the ticker/price JSON snapshot
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

fn default_api_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "data/sa-gateway.db".to_string()
}

fn default_ttl_secs() -> i64 {
    24 * 60 * 60
}

fn default_context_window() -> usize {
    20
}

fn default_dataset_path() -> String {
    "data/tickers.json".to_string()
}

/// Main configuration for sa-gateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// HTTP API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Session store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Ticker dataset configuration
    #[serde(default)]
    pub dataset: DatasetConfig,
}

impl Config {
    /// Expand `${VAR_NAME}` references with environment variable values.
    ///
    /// Unset variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file.
    ///
    /// `${VAR_NAME}` references in the file are expanded first, and any
    /// explicitly set environment variables override the file afterwards.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let expanded_content = Self::expand_env_vars(&toml_content);

        let mut config: Config = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Tries `./sa-gateway.toml` first, and falls back to environment
    /// variables only.
    pub fn load() -> crate::Result<Self> {
        if Path::new("sa-gateway.toml").exists() {
            return Self::from_toml_file("sa-gateway.toml");
        }

        Self::from_env()
    }

    /// Override configuration values from environment variables.
    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var("LLM_API_KEY") {
            self.llm.api_key = api_key;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            if !model.is_empty() {
                self.llm.model = model;
            }
        }
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            if !provider.is_empty() {
                self.llm.provider = LlmProvider::from_name(&provider);
            }
        }
        if let Ok(base_url) = std::env::var("LLM_BASE_URL") {
            if !base_url.is_empty() {
                self.llm.base_url = Some(base_url);
            }
        }

        if let Ok(port) = std::env::var("API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(path) = std::env::var("DB_PATH") {
            self.store.db_path = path;
        }
        if let Ok(ttl) = std::env::var("SESSION_TTL_SECS") {
            if let Ok(t) = ttl.parse() {
                self.store.ttl_secs = t;
            }
        }
        if let Ok(window) = std::env::var("CONTEXT_WINDOW") {
            if let Ok(w) = window.parse() {
                self.store.context_window = w;
            }
        }

        if let Ok(path) = std::env::var("DATASET_PATH") {
            self.dataset.path = path;
        }
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> crate::Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| Error::Config("LLM_API_KEY not set".to_string()))?;

        let mut config = Config {
            llm: LlmConfig {
                api_key,
                ..LlmConfig::default()
            },
            ..Config::default()
        };
        config.apply_env_overrides();

        Ok(config)
    }
}
