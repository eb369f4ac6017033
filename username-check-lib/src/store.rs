//! Persistent dedup state: the checked-set and the valid-log.
//!
//! The checked-set records every name processed in any run (the on-disk
//! "blacklist", meaning "already checked", not "malicious"). The valid-log
//! is an append-only record of names confirmed available. Both are flushed
//! synchronously on every mutation, so a crash loses at most the in-flight
//! name.
//!
//! Two independent locks guard the two files. They protect disjoint
//! resources and are never held together.

use crate::error::CheckError;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory view of the checked-set, kept in insertion order so the
/// persisted file stays stable across rewrites.
#[derive(Debug, Default)]
struct CheckedSet {
    names: Vec<String>,
    index: HashSet<String>,
}

/// Concurrency-safe store for the checked-set and valid-log files.
#[derive(Debug)]
pub struct DedupStore {
    /// Guards the in-memory set and the checked-file rewrite as one
    /// atomic read-modify-write sequence.
    checked: Mutex<CheckedSet>,
    checked_path: PathBuf,

    /// Guards valid-log appends. Independent from `checked` so an append
    /// never waits on a full-file rewrite.
    valid_lock: Mutex<()>,
    valid_path: PathBuf,
}

impl DedupStore {
    /// Create a store with an empty checked-set, without touching disk.
    ///
    /// Used when the existing checked-set file cannot be read and the
    /// caller chooses to start fresh.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(checked_path: P, valid_path: Q) -> Self {
        Self {
            checked: Mutex::new(CheckedSet::default()),
            checked_path: checked_path.as_ref().to_path_buf(),
            valid_lock: Mutex::new(()),
            valid_path: valid_path.as_ref().to_path_buf(),
        }
    }

    /// Load the store, reading the checked-set file if it exists.
    ///
    /// A missing checked-set file is non-fatal (empty set). The valid-log
    /// is not read; it is opened in append mode on first write.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        checked_path: P,
        valid_path: Q,
    ) -> Result<Self, CheckError> {
        let checked_path = checked_path.as_ref().to_path_buf();
        let valid_path = valid_path.as_ref().to_path_buf();

        let mut set = CheckedSet::default();
        match std::fs::read_to_string(&checked_path) {
            Ok(content) => {
                for line in content.lines() {
                    let name = line.trim();
                    if name.is_empty() {
                        continue;
                    }
                    if set.index.insert(name.to_string()) {
                        set.names.push(name.to_string());
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "no checked-set file at {}, starting fresh",
                    checked_path.display()
                );
            }
            Err(e) => {
                return Err(CheckError::file_error(
                    checked_path.to_string_lossy(),
                    format!("Failed to read checked-set: {}", e),
                ));
            }
        }

        Ok(Self {
            checked: Mutex::new(set),
            checked_path,
            valid_lock: Mutex::new(()),
            valid_path,
        })
    }

    /// Whether `name` has already been processed in any run.
    pub fn already_checked(&self, name: &str) -> bool {
        self.checked
            .lock()
            .expect("checked-set lock poisoned")
            .index
            .contains(name)
    }

    /// Number of names in the checked-set.
    pub fn checked_count(&self) -> usize {
        self.checked
            .lock()
            .expect("checked-set lock poisoned")
            .names
            .len()
    }

    /// Record `name` as checked, persisting the whole set.
    ///
    /// Idempotent: inserting a name that is already present succeeds as a
    /// no-op without touching the file. Otherwise the full file content is
    /// rewritten under the lock, which keeps the persisted set
    /// duplicate-free under concurrent callers at the cost of O(n) work
    /// per insertion.
    pub fn mark_checked(&self, name: &str) -> Result<(), CheckError> {
        let mut set = self.checked.lock().expect("checked-set lock poisoned");

        if set.index.contains(name) {
            return Ok(());
        }
        set.index.insert(name.to_string());
        set.names.push(name.to_string());

        let mut content = String::with_capacity(set.names.len() * 12);
        for name in &set.names {
            content.push_str(name);
            content.push('\n');
        }

        std::fs::write(&self.checked_path, content).map_err(|e| {
            CheckError::file_error(
                self.checked_path.to_string_lossy(),
                format!("Failed to write checked-set: {}", e),
            )
        })
    }

    /// Append `name` to the valid-log.
    ///
    /// Holds the valid-log lock for the whole open-append sequence so
    /// concurrent callers never interleave partial lines.
    pub fn mark_valid(&self, name: &str) -> Result<(), CheckError> {
        let _guard = self.valid_lock.lock().expect("valid-log lock poisoned");

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.valid_path)
            .map_err(|e| {
                CheckError::file_error(
                    self.valid_path.to_string_lossy(),
                    format!("Failed to open valid-log: {}", e),
                )
            })?;

        writeln!(file, "{}", name).map_err(|e| {
            CheckError::file_error(
                self.valid_path.to_string_lossy(),
                format!("Failed to append to valid-log: {}", e),
            )
        })
    }
}
