//! Error types for expert-chat
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly hints for startup failures
//! - Exit codes for the CLI
//!
//! Completion failures never reach the user as an `Err`: the dispatcher folds
//! them into the answer text. Only `UnknownPersona` and startup errors do.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for expert-chat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,
    EnvFile = 103,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Connection errors (3xx)
    ConnectionFailed = 300,
    ConnectionTimeout = 301,

    // Completion API errors (4xx)
    AuthenticationFailed = 400,
    RateLimited = 401,
    CompletionFailed = 402,
    MalformedResponse = 403,

    // Persona errors (5xx)
    UnknownPersona = 500,

    // Server errors (7xx)
    ServerBind = 700,
    ServerFailed = 701,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            400..=499 => 40,
            500..=599 => 50,
            700..=799 => 70,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// The `.env` file could not be loaded
    #[error("Failed to load environment file {path}: {message}")]
    EnvFile { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Completion API Errors
    // ─────────────────────────────────────────────────────────────

    /// Could not reach the completion endpoint
    #[error("Failed to connect to {url}: {message}")]
    ConnectionFailed { url: String, message: String },

    /// The completion endpoint did not answer in time
    #[error("Request to {url} timed out: {message}")]
    ConnectionTimeout { url: String, message: String },

    /// API key missing or rejected (HTTP 401/403)
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Quota or rate limit rejection (HTTP 429)
    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    /// Any other failed completion request
    #[error("Completion request failed{}: {message}", status_suffix(.status))]
    CompletionFailed { status: Option<u16>, message: String },

    /// Response body did not decode
    #[error("Malformed completion response: {message}")]
    MalformedResponse { message: String },

    // ─────────────────────────────────────────────────────────────
    // Persona Errors
    // ─────────────────────────────────────────────────────────────

    /// Persona id is not in the registry
    #[error("未定義の専門家タイプです: {id}")]
    UnknownPersona { id: String },

    // ─────────────────────────────────────────────────────────────
    // Server Errors
    // ─────────────────────────────────────────────────────────────

    #[error("Failed to bind {addr}")]
    ServerBind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::EnvFile { .. } => ErrorCode::EnvFile,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::ConnectionFailed { .. } => ErrorCode::ConnectionFailed,
            Error::ConnectionTimeout { .. } => ErrorCode::ConnectionTimeout,
            Error::AuthenticationFailed { .. } => ErrorCode::AuthenticationFailed,
            Error::RateLimited { .. } => ErrorCode::RateLimited,
            Error::CompletionFailed { .. } => ErrorCode::CompletionFailed,
            Error::MalformedResponse { .. } => ErrorCode::MalformedResponse,

            Error::UnknownPersona { .. } => ErrorCode::UnknownPersona,

            Error::ServerBind { .. } => ErrorCode::ServerBind,
            Error::Server(_) => ErrorCode::ServerFailed,
            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether this error came from talking to the completion service
    pub fn is_completion_error(&self) -> bool {
        matches!(
            self,
            Error::ConnectionFailed { .. }
                | Error::ConnectionTimeout { .. }
                | Error::AuthenticationFailed { .. }
                | Error::RateLimited { .. }
                | Error::CompletionFailed { .. }
                | Error::MalformedResponse { .. }
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'expert-chat config init' to create a default configuration file.",
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'expert-chat config validate' to see details.",
            ),
            Error::ConfigValidation { .. } => {
                Some("Review the configuration file and fix the invalid values.")
            }
            Error::EnvFile { .. } => Some(
                "Check the --env-file path, or omit it to search for .env in the current directory.",
            ),
            Error::AuthenticationFailed { .. } => {
                Some("Set OPENAI_API_KEY in your .env file or environment.")
            }
            Error::RateLimited { .. } => {
                Some("Your API quota may be exhausted. Check your provider account.")
            }
            Error::UnknownPersona { .. } => {
                Some("Run 'expert-chat persona list' to see valid persona ids.")
            }
            Error::ServerBind { .. } => {
                Some("Another process may be using the port. Try --port with a different value.")
            }
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!("\x1b[31mError [{}]\x1b[0m: {}\n", self.code(), self);

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    pub fn config_validation(message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: None,
        }
    }

    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn unknown_persona(id: impl Into<String>) -> Self {
        Error::UnknownPersona { id: id.into() }
    }
}
