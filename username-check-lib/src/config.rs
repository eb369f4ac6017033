//! Configuration file parsing and management.
//!
//! This module handles loading checker configuration from TOML files,
//! validating it, and bridging it into the runtime [`CheckerConfig`].

use crate::error::CheckError;
use crate::generate::generate_usernames;
use crate::types::CheckerConfig;
use crate::utils::read_name_list;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Username source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernamesConfig {
    /// Use the custom username file instead of generating a batch
    #[serde(default)]
    pub custom: bool,

    /// How many usernames to generate when `custom` is false
    #[serde(default = "default_amount")]
    pub amount: usize,

    /// Length of each generated username
    #[serde(default = "default_length")]
    pub length: usize,
}

impl Default for UsernamesConfig {
    fn default() -> Self {
        Self {
            custom: false,
            amount: default_amount(),
            length: default_length(),
        }
    }
}

/// Retry policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Whether failed attempts are retried at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum sequential attempts per probe
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: default_max_attempts(),
        }
    }
}

/// Configuration loaded from a TOML file.
///
/// This represents the structure of the config file users create to drive
/// a run:
///
/// ```toml
/// threads = 10
/// timeout = 10
/// webhook = ""
///
/// [usernames]
/// custom = false
/// amount = 100
/// length = 5
///
/// [retry]
/// enabled = true
/// max_attempts = 3
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Username source settings
    #[serde(default)]
    pub usernames: UsernamesConfig,

    /// Retry policy settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Worker pool size
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Per-attempt HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Webhook notification target; empty or absent disables notification
    #[serde(default)]
    pub webhook: Option<String>,
}

fn default_amount() -> usize {
    100
}

fn default_length() -> usize {
    5
}

fn default_max_attempts() -> u32 {
    3
}

fn default_threads() -> usize {
    10
}

fn default_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl FileConfig {
    /// Bridge the file configuration into a runtime [`CheckerConfig`].
    pub fn into_checker_config(self) -> CheckerConfig {
        let mut config = CheckerConfig::default()
            .with_workers(self.threads)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_retry(self.retry.enabled)
            .with_max_attempts(self.retry.max_attempts);

        if let Some(webhook) = self.webhook {
            config = config.with_webhook(webhook);
        }

        config
    }

    /// Resolve the candidate username list per this configuration.
    ///
    /// With `usernames.custom = true`, reads the newline-delimited file at
    /// `custom_path`; otherwise generates `usernames.amount` random names
    /// of `usernames.length` characters.
    pub fn resolve_usernames<P: AsRef<Path>>(
        &self,
        custom_path: P,
    ) -> Result<Vec<String>, CheckError> {
        if self.usernames.custom {
            read_name_list(custom_path)
        } else {
            generate_usernames(self.usernames.amount, self.usernames.length)
        }
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// The parsed, validated configuration or an error.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, CheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CheckError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| CheckError::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", e),
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load a configuration file from the standard locations.
    ///
    /// Looks for `./data/config.toml` first, then `./username-check.toml`;
    /// the first file found wins.
    pub fn discover_and_load(&self) -> Result<FileConfig, CheckError> {
        for candidate in self.candidate_paths() {
            if candidate.exists() {
                if self.verbose {
                    eprintln!("Using config file: {}", candidate.display());
                }
                return self.load_file(&candidate);
            }
        }

        Err(CheckError::config(
            "no configuration file found (looked for ./data/config.toml and ./username-check.toml)",
        ))
    }

    /// Candidate config locations, in precedence order.
    fn candidate_paths(&self) -> Vec<PathBuf> {
        vec![
            PathBuf::from("./data/config.toml"),
            PathBuf::from("./username-check.toml"),
        ]
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), CheckError> {
        if config.threads == 0 || config.threads > 512 {
            return Err(CheckError::config("threads must be between 1 and 512"));
        }

        if config.timeout == 0 {
            return Err(CheckError::config("timeout must be at least 1 second"));
        }

        if config.retry.enabled && config.retry.max_attempts == 0 {
            return Err(CheckError::config(
                "retry.max_attempts must be at least 1 when retry is enabled",
            ));
        }

        if !config.usernames.custom {
            if config.usernames.amount == 0 {
                return Err(CheckError::config(
                    "usernames.amount must be at least 1 when generating",
                ));
            }
            if config.usernames.length == 0 {
                return Err(CheckError::config(
                    "usernames.length must be at least 1 when generating",
                ));
            }
        }

        Ok(())
    }
}
