//! Core data types for username availability checking.
//!
//! This module defines all the main data structures used throughout the library,
//! including probe outcomes, per-name results, configuration options, and the
//! shared run counters.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Classification of one completed probe for a username.
///
/// `ProbeFailed` is operationally identical to `Taken`: any uncertainty is
/// never reported as available.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Outcome {
    /// The remote service reported the username as free
    #[serde(rename = "available")]
    Available,

    /// The remote service reported the username as taken
    #[serde(rename = "taken")]
    Taken,

    /// Every attempt failed (transport, status, or decode); treated as taken
    #[serde(rename = "probe_failed")]
    ProbeFailed,
}

impl Outcome {
    /// Whether this outcome counts toward the valid counter.
    pub fn is_available(&self) -> bool {
        matches!(self, Outcome::Available)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Available => write!(f, "available"),
            Outcome::Taken => write!(f, "taken"),
            Outcome::ProbeFailed => write!(f, "probe failed"),
        }
    }
}

/// Result of fully processing one username through the pipeline.
///
/// `outcome` is `None` when the name was skipped because the checked-set
/// already contained it. No probe is made in that case, and the name is
/// counted as invalid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameResult {
    /// The username that was processed
    pub username: String,

    /// Probe classification, or `None` for a checked-set skip
    pub outcome: Option<Outcome>,

    /// How many HTTP attempts were made (0 for skips)
    pub attempts: u32,

    /// How long the probe took, when one was made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration: Option<Duration>,
}

impl UsernameResult {
    /// Whether this name was skipped via the checked-set.
    pub fn is_skipped(&self) -> bool {
        self.outcome.is_none()
    }

    /// Whether this name was confirmed available.
    pub fn is_available(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Available))
    }
}

/// Configuration options for a checker run.
///
/// This struct allows fine-tuning of the pipeline behavior, including
/// pool sizing, per-attempt timeout, and the retry policy.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Number of concurrent worker tasks; also the work-queue capacity
    /// Default: 10
    pub workers: usize,

    /// Timeout for each individual HTTP attempt
    /// Default: 10 seconds
    pub timeout: Duration,

    /// Whether failed attempts are retried at all
    /// Default: true
    pub retry_enabled: bool,

    /// Maximum sequential attempts per probe when retry is enabled
    /// Default: 3
    pub max_attempts: u32,

    /// Webhook URL notified on confirmed-available results
    /// `None` disables notification
    pub webhook: Option<String>,

    /// Override for the availability endpoint; `None` uses the fixed
    /// production endpoint. Intended for tests.
    pub endpoint: Option<String>,
}

impl Default for CheckerConfig {
    /// Create a sensible default configuration.
    fn default() -> Self {
        Self {
            workers: 10,
            timeout: Duration::from_secs(10),
            retry_enabled: true,
            max_attempts: 3,
            webhook: None,
            endpoint: None,
        }
    }
}

impl CheckerConfig {
    /// Create a new configuration with a custom worker count.
    ///
    /// Automatically caps the pool at 512 workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, 512);
        self
    }

    /// Set the per-attempt HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable per-attempt retry.
    pub fn with_retry(mut self, enabled: bool) -> Self {
        self.retry_enabled = enabled;
        self
    }

    /// Set the maximum attempts per probe.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the webhook notification target. An empty string disables it.
    pub fn with_webhook<S: Into<String>>(mut self, webhook: S) -> Self {
        let webhook = webhook.into();
        self.webhook = if webhook.is_empty() {
            None
        } else {
            Some(webhook)
        };
        self
    }

    /// Point probes at a different endpoint (used by tests).
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// The attempt budget a probe actually gets.
    ///
    /// With retry disabled this is always 1, regardless of `max_attempts`.
    pub fn effective_attempts(&self) -> u32 {
        if self.retry_enabled {
            self.max_attempts.max(1)
        } else {
            1
        }
    }
}

/// Shared counters updated by workers and read by the progress reporter.
///
/// Increments are atomic. No lock is taken, so counter updates never
/// contend with the persistence locks.
#[derive(Debug, Default)]
pub struct RunStats {
    valid: AtomicU64,
    invalid: AtomicU64,
}

impl RunStats {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one confirmed-available name.
    pub fn record_valid(&self) {
        self.valid.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one taken, failed, or skipped name.
    pub fn record_invalid(&self) {
        self.invalid.fetch_add(1, Ordering::Relaxed);
    }

    /// Current valid count.
    pub fn valid(&self) -> u64 {
        self.valid.load(Ordering::Relaxed)
    }

    /// Current invalid count.
    pub fn invalid(&self) -> u64 {
        self.invalid.load(Ordering::Relaxed)
    }

    /// Snapshot of (valid, invalid). The two loads are not mutually
    /// consistent, which is acceptable for progress display.
    pub fn snapshot(&self) -> (u64, u64) {
        (self.valid(), self.invalid())
    }
}

/// Aggregate totals for a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of names fed into the pipeline
    pub total: u64,

    /// Names confirmed available
    pub valid: u64,

    /// Names taken, failed, or skipped
    pub invalid: u64,

    /// Subset of `invalid` that were checked-set skips
    pub skipped: u64,
}
