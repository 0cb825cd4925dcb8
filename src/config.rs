//! Configuration system for expert-chat
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (EXPERT_CHAT_* prefix, plus OPENAI_API_KEY / OPENAI_API_BASE)
//! 3. Configuration file (TOML)
//! 4. Default values
//!
//! A `.env` file is loaded into the process environment before step 2.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

const CONFIG_FILE_NAME: &str = "expert-chat.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Completion service settings
    pub completion: CompletionSettings,

    /// Web UI server settings
    pub server: ServerSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Which completion service to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Any OpenAI-compatible HTTP endpoint
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    /// Offline echo service
    #[serde(rename = "mock")]
    Mock,
}

impl std::str::FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(Error::config_field_invalid(
                "completion.provider",
                format!("Unknown provider '{}'. Must be one of: openai, mock", other),
            )),
        }
    }
}

/// Completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// Provider implementation
    pub provider: ProviderKind,

    /// API base URL (e.g., "https://api.openai.com/v1", "http://localhost:11434/v1")
    pub base_url: String,

    /// API key (normally supplied through OPENAI_API_KEY)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds (unset = HTTP client default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Web UI server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Interface to bind
    pub host: String,

    /// TCP port
    pub port: u16,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl ChatConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                message: format!("{}: {}", path.display(), e.message()),
                source: Some(e),
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides()?;

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            return if path.exists() {
                Ok(Some(path))
            } else {
                Err(Error::config_not_found(path))
            };
        }

        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            dirs::config_dir()
                .map(|p| p.join("expert-chat").join("config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".expert-chat").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &search_paths {
            if !path.as_os_str().is_empty() && path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // Completion settings
        if let Ok(val) = std::env::var("EXPERT_CHAT_PROVIDER") {
            self.completion.provider = val.parse()?;
        }
        if let Ok(val) = std::env::var("OPENAI_API_BASE") {
            self.completion.base_url = val;
        }
        if let Ok(val) = std::env::var("EXPERT_CHAT_BASE_URL") {
            self.completion.base_url = val;
        }
        if let Ok(val) = std::env::var("OPENAI_API_KEY") {
            self.completion.api_key = val;
        }
        if let Ok(val) = std::env::var("EXPERT_CHAT_MODEL") {
            self.completion.model = val;
        }
        if let Ok(val) = std::env::var("EXPERT_CHAT_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.completion.timeout_secs = Some(n);
            }
        }

        // Server settings
        if let Ok(val) = std::env::var("EXPERT_CHAT_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("EXPERT_CHAT_PORT") {
            if let Ok(n) = val.parse() {
                self.server.port = n;
            }
        }

        // Logging settings
        if let Ok(val) = std::env::var("EXPERT_CHAT_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("EXPERT_CHAT_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("EXPERT_CHAT_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        Ok(())
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let url = &self.completion.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::config_field_invalid(
                "completion.base_url",
                format!("Base URL must start with http:// or https:// (got '{}')", url),
            ));
        }

        if self.completion.model.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "completion.model",
                "Model cannot be empty",
            ));
        }

        if self.server.host.trim().is_empty() {
            return Err(Error::config_field_invalid("server.host", "Host cannot be empty"));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// `host:port` string the web server binds
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Copy safe to print: the API key is masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.completion.api_key.is_empty() {
            copy.completion.api_key = "********".to_string();
        }
        copy
    }
}

/// Load a `.env` file into the process environment.
///
/// An explicit path must exist. Without one, the first `.env` found in the
/// working directory or its ancestors is used, and a missing file is fine.
/// Variables already set in the environment win over the file.
pub fn load_env_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
    match explicit_path {
        Some(path) => {
            let path = PathBuf::from(expand_path(path));
            dotenvy::from_path(&path).map_err(|e| Error::EnvFile {
                path: path.clone(),
                message: e.to_string(),
            })?;
            Ok(Some(path))
        }
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(Error::EnvFile {
                path: PathBuf::from(".env"),
                message: e.to_string(),
            }),
        },
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(default_config_path);

    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    Ok(config_path)
}

fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".expert-chat")
        .join("config.toml")
}

/// Default configuration content with comments
const DEFAULT_CONFIG: &str = r#"# expert-chat configuration

[completion]
# Provider: "openai" (any OpenAI-compatible endpoint) or "mock" (offline echo)
provider = "openai"

# API base URL (OpenAI, Ollama, vLLM, LM Studio, etc.)
base_url = "https://api.openai.com/v1"

# The API key is read from OPENAI_API_KEY (environment or .env file).
# api_key = ""

# Model identifier
model = "gpt-3.5-turbo"

# Request timeout in seconds (leave unset to use the HTTP client default)
# timeout_secs = 60

[server]
# Interface and port for the web UI
host = "127.0.0.1"
port = 8501

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.expert-chat/logs/expert-chat.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.completion.provider, ProviderKind::OpenAi);
        assert_eq!(config.completion.base_url, "https://api.openai.com/v1");
        assert_eq!(config.completion.model, "gpt-3.5-turbo");
        assert!(config.completion.timeout_secs.is_none());
        assert_eq!(config.bind_address(), "127.0.0.1:8501");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_override() {
        env::set_var("EXPERT_CHAT_MODEL", "gpt-4o-mini");
        env::set_var("EXPERT_CHAT_PORT", "9000");
        env::set_var("EXPERT_CHAT_TIMEOUT_SECS", "30");

        let mut config = ChatConfig::default();
        config.apply_env_overrides().unwrap();

        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.completion.timeout_secs, Some(30));

        env::remove_var("EXPERT_CHAT_MODEL");
        env::remove_var("EXPERT_CHAT_PORT");
        env::remove_var("EXPERT_CHAT_TIMEOUT_SECS");
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("mock".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("anthropic".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut config = ChatConfig::default();
        config.completion.base_url = "ftp://example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigValidation { field: Some(ref f), .. }) if f == "completion.base_url"
        ));
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = ChatConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_host() {
        let mut config = ChatConfig::default();
        config.server.host = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(ChatConfig::default().validate().is_ok());
    }

    #[test]
    fn test_redacted_masks_key() {
        let mut config = ChatConfig::default();
        config.completion.api_key = "sk-secret".to_string();
        let shown = toml::to_string(&config.redacted()).unwrap();
        assert!(!shown.contains("sk-secret"));
        assert!(shown.contains("********"));

        // No key: nothing to mask, field omitted
        let shown = toml::to_string(&ChatConfig::default().redacted()).unwrap();
        assert!(!shown.contains("api_key"));
    }

    #[test]
    fn test_parse_config_file() {
        let config_str = r#"
[completion]
provider = "mock"
base_url = "http://localhost:11434/v1"
model = "llama3"
timeout_secs = 45

[server]
port = 8080

[logging]
level = "debug"
"#;

        let config: ChatConfig = toml::from_str(config_str).unwrap();
        assert_eq!(config.completion.provider, ProviderKind::Mock);
        assert_eq!(config.completion.base_url, "http://localhost:11434/v1");
        assert_eq!(config.completion.model, "llama3");
        assert_eq!(config.completion.timeout_secs, Some(45));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_default_config_template_parses() {
        let config: ChatConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, ServerSettings::default().port);
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = ChatConfig::load(Some("/nonexistent/expert-chat.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let path_str = path.to_str().unwrap();

        let written = init_config(Some(path_str), false).unwrap();
        assert_eq!(written, path);
        assert!(path.exists());

        assert!(init_config(Some(path_str), false).is_err());
        assert!(init_config(Some(path_str), true).is_ok());
    }

    #[test]
    fn test_load_env_file_explicit() {
        let tmp = TempDir::new().unwrap();
        let env_path = tmp.path().join(".env");
        fs::write(&env_path, "EXPERT_CHAT_TEST_ENV_FILE_VAR=loaded\n").unwrap();

        let loaded = load_env_file(env_path.to_str()).unwrap();
        assert_eq!(loaded, Some(env_path));
        assert_eq!(env::var("EXPERT_CHAT_TEST_ENV_FILE_VAR").unwrap(), "loaded");
        env::remove_var("EXPERT_CHAT_TEST_ENV_FILE_VAR");
    }

    #[test]
    fn test_load_env_file_explicit_missing() {
        let err = load_env_file(Some("/nonexistent/.env")).unwrap_err();
        assert!(matches!(err, Error::EnvFile { .. }));
    }
}
