//! Main username checker implementation.
//!
//! This module provides the primary `UsernameChecker` struct that owns the
//! concurrent check pipeline: a bounded work queue fed by a single
//! producer, a fixed pool of worker tasks running the per-name state
//! machine, and the shared counters and dedup store they update.

use crate::error::CheckError;
use crate::notify::WebhookNotifier;
use crate::probe::ProbeClient;
use crate::proxy::ProxyPool;
use crate::store::DedupStore;
use crate::types::{CheckerConfig, Outcome, RunStats, RunSummary, UsernameResult};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

/// Coordinates a full availability-checking run.
///
/// The checker does not mutate its inputs: the proxy pool and candidate
/// list are read-only after load, and all shared mutable state (counters,
/// checked-set, valid-log) is reached only through its locked or atomic
/// operations.
///
/// # Example
///
/// ```rust,no_run
/// use username_check_lib::{CheckerConfig, DedupStore, ProxyPool, UsernameChecker};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = Arc::new(DedupStore::load("data/blacklist.txt", "data/valids.txt")?);
///     let proxies = Arc::new(ProxyPool::load("data/proxies.txt")?);
///     let checker = UsernameChecker::new(CheckerConfig::default(), store, proxies)?;
///
///     let summary = checker.run(vec!["alice".into(), "bob123".into()]).await;
///     println!("valid: {}, invalid: {}", summary.valid, summary.invalid);
///     Ok(())
/// }
/// ```
pub struct UsernameChecker {
    /// Configuration settings for this checker instance
    config: CheckerConfig,
    /// Probe client shared by all workers
    probe: ProbeClient,
    /// Persistent dedup state (checked-set + valid-log)
    store: Arc<DedupStore>,
    /// Read-only proxy pool
    proxies: Arc<ProxyPool>,
    /// Optional webhook notifier for confirmed-available names
    notifier: Option<WebhookNotifier>,
    /// Shared run counters (read by the progress reporter)
    stats: Arc<RunStats>,
}

impl UsernameChecker {
    /// Create a checker from configuration and pre-loaded state.
    ///
    /// # Errors
    ///
    /// Returns `CheckError` if the webhook notifier cannot be constructed.
    pub fn new(
        config: CheckerConfig,
        store: Arc<DedupStore>,
        proxies: Arc<ProxyPool>,
    ) -> Result<Self, CheckError> {
        let probe = match &config.endpoint {
            Some(endpoint) => ProbeClient::with_endpoint(
                endpoint.clone(),
                config.timeout,
                config.effective_attempts(),
            ),
            None => ProbeClient::new(config.timeout, config.effective_attempts()),
        };

        let notifier = match &config.webhook {
            Some(url) => Some(WebhookNotifier::new(url.clone())?),
            None => None,
        };

        Ok(Self {
            config,
            probe,
            store,
            proxies,
            notifier,
            stats: Arc::new(RunStats::new()),
        })
    }

    /// Get the current configuration for this checker.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Shared counters, for wiring up a progress reporter.
    pub fn stats(&self) -> Arc<RunStats> {
        Arc::clone(&self.stats)
    }

    /// Run the pipeline over `usernames`, streaming results as workers
    /// finish them.
    ///
    /// Every name is enqueued exactly once, in input order, onto a bounded
    /// queue whose capacity equals the worker count, so the producer blocks
    /// once workers fall behind, which caps memory for large inputs.
    /// Completion order across workers is unspecified.
    ///
    /// The returned channel closes after the last worker exits, i.e. after
    /// every enqueued name has fully passed through the per-name state
    /// machine. Dropping the receiver early tears the pool down.
    pub fn check_stream(&self, usernames: Vec<String>) -> mpsc::Receiver<UsernameResult> {
        let workers = self.config.workers.max(1);

        let (work_tx, work_rx) = mpsc::channel::<String>(workers);
        let work_rx = Arc::new(Mutex::new(work_rx));
        let (result_tx, result_rx) = mpsc::channel::<UsernameResult>(workers);

        // Single producer: feed every name, then close the queue by
        // dropping the sender.
        tokio::spawn(async move {
            for username in usernames {
                if work_tx.send(username).await.is_err() {
                    // All workers gone; nothing left to feed.
                    break;
                }
            }
        });

        for worker_id in 1..=workers {
            let worker = Worker {
                probe: self.probe.clone(),
                store: Arc::clone(&self.store),
                proxies: Arc::clone(&self.proxies),
                notifier: self.notifier.clone(),
                stats: Arc::clone(&self.stats),
            };
            let work_rx = Arc::clone(&work_rx);
            let result_tx = result_tx.clone();

            tokio::spawn(async move {
                loop {
                    // Take the queue lock only to dequeue; processing
                    // happens with the lock released.
                    let username = { work_rx.lock().await.recv().await };
                    let Some(username) = username else {
                        break;
                    };

                    let result = worker.process_name(worker_id, username).await;
                    if result_tx.send(result).await.is_err() {
                        break;
                    }
                }
            });
        }

        result_rx
    }

    /// Run the pipeline to completion and return aggregate totals.
    ///
    /// This drains [`check_stream`](Self::check_stream) internally; use the
    /// stream directly when per-result output is needed.
    pub async fn run(&self, usernames: Vec<String>) -> RunSummary {
        let total = usernames.len() as u64;
        let mut results = self.check_stream(usernames);

        let mut valid = 0u64;
        let mut invalid = 0u64;
        let mut skipped = 0u64;

        while let Some(result) = results.recv().await {
            if result.is_skipped() {
                skipped += 1;
                invalid += 1;
            } else if result.is_available() {
                valid += 1;
            } else {
                invalid += 1;
            }
        }

        RunSummary {
            total,
            valid,
            invalid,
            skipped,
        }
    }
}

/// Per-worker view of the shared pipeline state.
#[derive(Clone)]
struct Worker {
    probe: ProbeClient,
    store: Arc<DedupStore>,
    proxies: Arc<ProxyPool>,
    notifier: Option<WebhookNotifier>,
    stats: Arc<RunStats>,
}

impl Worker {
    /// Run one name through the per-name state machine.
    ///
    /// Every failure inside this function is fully handled here (logged,
    /// classified, or defaulted), so no error ever crosses the worker
    /// boundary and the pool never aborts for a single name.
    async fn process_name(&self, worker_id: usize, username: String) -> UsernameResult {
        // Already known from a prior or concurrent run: counted invalid,
        // no network call.
        if self.store.already_checked(&username) {
            self.stats.record_invalid();
            tracing::debug!(username = %username, worker = worker_id, "already checked, skipping");
            return UsernameResult {
                username,
                outcome: None,
                attempts: 0,
                check_duration: None,
            };
        }

        // Proxy selection happens once per name; the probe reuses this
        // selection for every attempt.
        let proxy = self.proxies.pick().map(str::to_string);

        let started = Instant::now();
        let (outcome, attempts) = self.probe.probe(&username, proxy.as_deref()).await;
        let check_duration = started.elapsed();

        match outcome {
            Outcome::Available => {
                self.stats.record_valid();

                if let Err(e) = self.store.mark_checked(&username) {
                    tracing::error!(username = %username, error = %e, "failed to persist checked-set");
                }
                if let Err(e) = self.store.mark_valid(&username) {
                    tracing::error!(username = %username, error = %e, "failed to persist valid-log");
                }

                if let Some(notifier) = &self.notifier {
                    if let Err(e) = notifier.notify_available(&username).await {
                        tracing::error!(username = %username, error = %e, "webhook delivery failed");
                    }
                }
            }
            Outcome::Taken | Outcome::ProbeFailed => {
                self.stats.record_invalid();

                if let Err(e) = self.store.mark_checked(&username) {
                    tracing::error!(username = %username, error = %e, "failed to persist checked-set");
                }
            }
        }

        UsernameResult {
            username,
            outcome: Some(outcome),
            attempts,
            check_duration: Some(check_duration),
        }
    }
}
