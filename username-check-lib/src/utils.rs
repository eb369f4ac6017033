//! Utility functions for input loading.
//!
//! This module contains helpers for reading the newline-delimited input
//! files (username lists) used throughout the library.

use crate::error::CheckError;
use std::path::Path;

/// Read a newline-delimited name list from `path`.
///
/// Lines are trimmed; blank lines are skipped. A missing or unreadable
/// file is an error; callers decide whether that is fatal.
pub fn read_name_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>, CheckError> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path).map_err(|e| {
        CheckError::file_error(
            path.to_string_lossy(),
            format!("Failed to read name list: {}", e),
        )
    })?;

    Ok(parse_name_list(&content))
}

/// Parse newline-delimited content into trimmed, non-empty names.
pub fn parse_name_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
