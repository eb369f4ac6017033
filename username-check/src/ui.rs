//! Display logic for the username-check CLI.
//!
//! This module handles all console output: colored per-event result lines,
//! the run header, the final summary, and the background progress reporter
//! that mirrors the counters into the console title. Uses only the
//! `console` crate (already a dependency).

use console::{pad_str, style, Alignment, Term};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use username_check_lib::{Outcome, RunStats, RunSummary, UsernameResult};

// ── Progress title reporter ──────────────────────────────────────────────────

/// How often the console title is refreshed.
const TITLE_INTERVAL: Duration = Duration::from_secs(1);

/// A background task that periodically renders the shared counters into
/// the console title. Purely cosmetic: it reads possibly-stale snapshots
/// and is stopped without ceremony when the pipeline completes.
pub struct TitleReporter {
    running: Arc<AtomicBool>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TitleReporter {
    /// Start the reporter over `stats` for a run of `total` names.
    pub fn start(stats: Arc<RunStats>, total: u64) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            while running_clone.load(Ordering::Relaxed) {
                term.set_title(title_line(&stats, total));
                tokio::time::sleep(TITLE_INTERVAL).await;
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the reporter.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            h.abort();
            let _ = h.await;
        }
    }
}

/// Format the console-title progress line from a counter snapshot.
fn title_line(stats: &RunStats, total: u64) -> String {
    let (valid, invalid) = stats.snapshot();
    let remaining = total.saturating_sub(valid + invalid);
    format!(
        "username-check | Valid: {} | Failed: {} | Remaining: {}",
        valid, invalid, remaining
    )
}

// ── Header ───────────────────────────────────────────────────────────────────

/// Print a styled header at the start of a run.
pub fn print_header(total: usize, workers: usize, proxies: usize, retry_attempts: u32) {
    println!(
        "{} {} {}",
        style("username-check").bold(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
        style(format!(
            "— Checking {} username{}",
            total,
            if total == 1 { "" } else { "s" }
        ))
        .dim(),
    );

    let mut meta_parts: Vec<String> = vec![format!("Workers: {}", workers)];
    if proxies > 0 {
        meta_parts.push(format!("Proxies: {}", proxies));
    } else {
        meta_parts.push("Direct connection".to_string());
    }
    meta_parts.push(format!("Attempts: {}", retry_attempts));

    println!("{}", style(meta_parts.join(" | ")).dim());
    println!();
}

// ── Single result line ───────────────────────────────────────────────────────

/// Status label for a processed name.
fn status_label(result: &UsernameResult) -> &'static str {
    match result.outcome {
        None => "SKIPPED",
        Some(Outcome::Available) => "AVAILABLE",
        Some(Outcome::Taken) => "TAKEN",
        Some(Outcome::ProbeFailed) => "FAILED",
    }
}

/// Format and print a single result with colors and alignment.
///
/// If `counter` is Some((current, total)), a progress prefix like `[3/8]`
/// is shown.
pub fn print_result(result: &UsernameResult, counter: Option<(usize, usize)>, debug: bool) {
    let name_width = 24;
    let padded = pad_str(&result.username, name_width, Alignment::Left, Some(".."));

    let prefix = match counter {
        Some((cur, total)) => format!("{} ", style(format!("[{}/{}]", cur, total)).dim()),
        None => String::new(),
    };

    let label = status_label(result);
    match result.outcome {
        Some(Outcome::Available) => {
            println!(
                "  {}{}  {}",
                prefix,
                style(&padded).white(),
                style(label).green().bold(),
            );
        }
        Some(Outcome::Taken) => {
            println!(
                "  {}{}  {}",
                prefix,
                style(&padded).white(),
                style(label).red().bold(),
            );
        }
        Some(Outcome::ProbeFailed) => {
            println!(
                "  {}{}  {}  {}",
                prefix,
                style(&padded).white(),
                style(label).yellow().bold(),
                style("(all attempts failed, treated as taken)").dim(),
            );
        }
        None => {
            println!(
                "  {}{}  {}  {}",
                prefix,
                style(&padded).white(),
                style(label).yellow(),
                style("(already checked)").dim(),
            );
        }
    }

    if debug {
        if let Some(duration) = result.check_duration {
            println!(
                "    {} {} attempt{} in {}ms",
                style("└─").dim(),
                result.attempts,
                if result.attempts == 1 { "" } else { "s" },
                duration.as_millis(),
            );
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final summary bar with colored counts.
pub fn print_summary(summary: &RunSummary, duration: Duration) {
    println!();
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} username{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(summary.total).bold(),
        if summary.total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} valid", summary.valid)).green(),
        style("|").dim(),
        style(format!("{} invalid", summary.invalid)).red(),
        style("|").dim(),
        style(format!("{} skipped", summary.skipped)).yellow(),
    );
}

// ── Tests ────────────────────────────────────────────────────────────────────
