//! Error handling for username checking operations.
//!
//! This module defines a comprehensive error type that covers all the different
//! ways username checking can fail, from network issues to invalid input.

use std::fmt;

/// Main error type for username checking operations.
///
/// This enum covers all possible failure modes in the checking process,
/// providing detailed context for debugging and user-friendly error messages.
#[derive(Debug, Clone)]
pub enum CheckError {
    /// Network-related errors (connection, timeout, etc.)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// The availability API rejected or failed a probe attempt
    ApiError {
        username: String,
        message: String,
        status_code: Option<u16>,
    },

    /// JSON parsing errors for request or response bodies
    ParseError { message: String },

    /// Configuration errors (invalid settings, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading input lists or persisting state
    FileError { path: String, message: String },

    /// Timeout errors when operations take too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Webhook notification delivery failures
    NotifyError { message: String },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl CheckError {
    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new API error.
    pub fn api<U: Into<String>, M: Into<String>>(username: U, message: M) -> Self {
        Self::ApiError {
            username: username.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new API error with HTTP status code.
    pub fn api_with_status<U: Into<String>, M: Into<String>>(
        username: U,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::ApiError {
            username: username.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new notification error.
    pub fn notify<M: Into<String>>(message: M) -> Self {
        Self::NotifyError {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::ApiError {
                username,
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error for '{}' (HTTP {}): {}", username, code, message)
                } else {
                    write!(f, "API error for '{}': {}", username, message)
                }
            }
            Self::ParseError { message } => {
                write!(f, "Parse error: {}", message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::NotifyError { message } => {
                write!(f, "Notification error: {}", message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for CheckError {}

// Implement From conversions for common error types
impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", std::time::Duration::from_secs(30))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
        }
    }
}

impl From<std::io::Error> for CheckError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<toml::de::Error> for CheckError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("TOML parsing failed: {}", err),
        }
    }
}
