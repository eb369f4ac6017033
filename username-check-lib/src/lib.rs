//! # Username Check Library
//!
//! A concurrent, proxy-aware library for checking username availability
//! against a remote service.
//!
//! The core is a bounded worker pool consuming a work queue: each worker
//! executes a retrying, proxy-aware network probe for one candidate name,
//! classifies the result, and updates shared counters and persistent
//! result sets under concurrency-safe discipline. Names already recorded
//! in the persisted checked-set are skipped, so repeated runs never
//! re-probe known results.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use username_check_lib::{CheckerConfig, DedupStore, ProxyPool, UsernameChecker};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(DedupStore::load("data/blacklist.txt", "data/valids.txt")?);
//!     let proxies = Arc::new(ProxyPool::load("data/proxies.txt")?);
//!     let checker = UsernameChecker::new(CheckerConfig::default(), store, proxies)?;
//!
//!     let summary = checker.run(vec!["alice".into()]).await;
//!     println!("valid: {} invalid: {}", summary.valid, summary.invalid);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded Concurrency**: fixed worker pool over a bounded queue
//! - **Proxy Rotation**: uniform random proxy selection per name
//! - **Fixed-Attempt Retry**: per-attempt retry with conservative fallback
//! - **Persistent Dedup**: checked-set and valid-log survive restarts
//! - **Webhook Notification**: optional delivery on confirmed-available

// Re-export main public API types and functions
// This makes them available as username_check_lib::TypeName
pub use checker::UsernameChecker;
pub use config::{ConfigManager, FileConfig, RetryConfig, UsernamesConfig};
pub use error::CheckError;
pub use notify::WebhookNotifier;
pub use probe::{ProbeClient, USERNAME_CHECK_API, USER_AGENT};
pub use proxy::ProxyPool;
pub use store::DedupStore;
pub use types::{CheckerConfig, Outcome, RunStats, RunSummary, UsernameResult};

// Re-export generation helpers for convenience
pub use generate::{generate_username, generate_usernames};
pub use utils::{parse_name_list, read_name_list};

// Internal modules - these are not part of the public API
mod checker;
mod config;
mod error;
mod generate;
mod notify;
mod probe;
mod proxy;
mod store;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, CheckError>;

// Library version for display purposes
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
