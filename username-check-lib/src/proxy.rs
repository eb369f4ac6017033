//! Proxy pool loading and selection.
//!
//! Proxies are loaded once from a newline-delimited file and are immutable
//! for the rest of the run. Selection is uniformly random with no health
//! tracking: a proxy that fails a probe stays in rotation unchanged.

use crate::error::CheckError;
use rand::Rng;
use std::path::Path;

/// Placeholder line shipped in the default proxies file; never a real proxy.
const PLACEHOLDER_LINE: &str = "Proxies goes here";

/// An immutable pool of proxy endpoint URIs.
///
/// An empty pool is a valid state meaning "direct connection only".
#[derive(Debug, Clone, Default)]
pub struct ProxyPool {
    proxies: Vec<String>,
}

impl ProxyPool {
    /// Create a pool from already-normalized proxy URIs.
    pub fn new(proxies: Vec<String>) -> Self {
        Self { proxies }
    }

    /// Load a pool from a newline-delimited proxy file.
    ///
    /// A missing file is not an error (the checker can run without
    /// proxies), but any other I/O failure propagates.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CheckError> {
        let path = path.as_ref();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("no proxy file at {}, running without proxies", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CheckError::file_error(
                    path.to_string_lossy(),
                    format!("Failed to read proxy file: {}", e),
                ));
            }
        };

        Ok(Self::new(Self::parse(&content)))
    }

    /// Parse proxy file content into normalized endpoint URIs.
    ///
    /// Rules:
    /// - blank lines, `#` comments, and the placeholder line are ignored
    /// - lines without a `:` are rejected with a warning and skipped
    /// - lines without an explicit scheme get `http://` prepended
    pub fn parse(content: &str) -> Vec<String> {
        let mut proxies = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == PLACEHOLDER_LINE {
                continue;
            }

            if !trimmed.contains(':') {
                tracing::warn!("invalid proxy format, skipping: {}", trimmed);
                continue;
            }

            if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                proxies.push(trimmed.to_string());
            } else {
                proxies.push(format!("http://{}", trimmed));
            }
        }

        proxies
    }

    /// Pick one proxy uniformly at random, or `None` if the pool is empty.
    ///
    /// Selection happens once per name; the probe reuses the returned
    /// proxy for every attempt.
    pub fn pick(&self) -> Option<&str> {
        if self.proxies.is_empty() {
            return None;
        }
        let idx = rand::thread_rng().gen_range(0..self.proxies.len());
        Some(&self.proxies[idx])
    }

    /// Number of proxies in the pool.
    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    /// Whether the pool is empty (direct connections only).
    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}
