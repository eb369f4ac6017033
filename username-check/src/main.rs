//! Username Check CLI Application
//!
//! A command-line interface for checking username availability against the
//! remote service, with a bounded worker pool, proxy rotation, and
//! persistent dedup state. This CLI application provides a user-friendly
//! interface to the username-check-lib library.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use username_check_lib::{
    read_name_list, CheckerConfig, ConfigManager, DedupStore, FileConfig, ProxyPool, RunSummary,
    UsernameChecker,
};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Default data directory holding config and state files.
const DEFAULT_DATA_DIR: &str = "data";

// File names inside the data directory.
const CONFIG_FILE: &str = "config.toml";
const USERNAMES_FILE: &str = "usernames.txt";
const PROXIES_FILE: &str = "proxies.txt";
const BLACKLIST_FILE: &str = "blacklist.txt";
const VALIDS_FILE: &str = "valids.txt";

/// CLI arguments for username-check
#[derive(Parser, Debug)]
#[command(name = "username-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check username availability with a concurrent, proxy-aware worker pool")]
#[command(
    long_about = "Check username availability against the remote service.\n\nRuns a fixed pool of concurrent workers with per-attempt retry and proxy rotation, and keeps a persistent checked-set so repeated runs never re-probe known names."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Use a specific config file instead of the data-dir default
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Directory holding config and state files
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = DEFAULT_DATA_DIR,
        help_heading = "Configuration"
    )]
    pub data_dir: String,

    /// Input file with usernames (one per line); implies a custom list
    #[arg(short = 'f', long = "file", value_name = "FILE", help_heading = "Input")]
    pub file: Option<String>,

    /// Proxy list file (one host:port per line)
    #[arg(long = "proxies", value_name = "FILE", help_heading = "Input")]
    pub proxies: Option<String>,

    /// Worker pool size (overrides config)
    #[arg(short = 't', long = "threads", value_name = "N", help_heading = "Performance")]
    pub threads: Option<usize>,

    /// Per-attempt HTTP timeout in seconds (overrides config)
    #[arg(long = "timeout", value_name = "SECS", help_heading = "Performance")]
    pub timeout: Option<u64>,

    /// Disable per-attempt retry (single attempt per name)
    #[arg(long = "no-retry", help_heading = "Performance")]
    pub no_retry: bool,

    /// Webhook URL notified on confirmed-available names (overrides config)
    #[arg(long = "webhook", value_name = "URL", help_heading = "Notification")]
    pub webhook: Option<String>,

    /// Show per-name attempt counts and durations
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging (library diagnostics on stderr)
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Library diagnostics on stderr: I/O and delivery errors always,
    // retry attempts with --verbose, per-name tracing with --debug.
    let default_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "error"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run_check(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if args.threads == Some(0) {
        return Err("Thread count must be at least 1".to_string());
    }

    if args.timeout == Some(0) {
        return Err("Timeout must be at least 1 second".to_string());
    }

    Ok(())
}

/// Main checking logic
async fn run_check(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = PathBuf::from(&args.data_dir);

    // Step 1: Configuration. Failure here aborts before any work begins.
    let file_config = load_config(&args, &data_dir)?;
    let config = build_config(&args, file_config.clone());

    // Step 2: Proxies. A missing file means direct connections only.
    let proxies_path = args
        .proxies
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join(PROXIES_FILE));
    let proxies = ProxyPool::load(&proxies_path)?;
    if args.verbose && !proxies.is_empty() {
        eprintln!("Loaded {} proxies from {}", proxies.len(), proxies_path.display());
    }

    // Step 3: Candidate usernames. An empty list aborts.
    let usernames = resolve_usernames(&args, &file_config, &data_dir)?;
    if usernames.is_empty() {
        return Err(
            "No usernames to check. Configure [usernames] in config.toml or provide --file"
                .into(),
        );
    }

    // Step 4: Persistent dedup state. An unreadable checked-set file is
    // downgraded to a fresh one.
    let checked_path = data_dir.join(BLACKLIST_FILE);
    let valids_path = data_dir.join(VALIDS_FILE);
    let store = match DedupStore::load(&checked_path, &valids_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Warning: {} (starting with a fresh checked-set)", e);
            DedupStore::new(&checked_path, &valids_path)
        }
    };
    if args.verbose {
        eprintln!("Checked-set loaded: {} names", store.checked_count());
    }

    // Step 5: Run the pipeline, rendering results as workers finish them.
    let total = usernames.len();
    ui::print_header(total, config.workers, proxies.len(), config.effective_attempts());

    let checker = UsernameChecker::new(config, Arc::new(store), Arc::new(proxies))?;
    let reporter = ui::TitleReporter::start(checker.stats(), total as u64);

    let start_time = std::time::Instant::now();
    let mut results = checker.check_stream(usernames);

    let mut valid = 0u64;
    let mut invalid = 0u64;
    let mut skipped = 0u64;
    let mut completed = 0usize;

    while let Some(result) = results.recv().await {
        completed += 1;
        if result.is_skipped() {
            skipped += 1;
            invalid += 1;
        } else if result.is_available() {
            valid += 1;
        } else {
            invalid += 1;
        }
        ui::print_result(&result, Some((completed, total)), args.debug);
    }

    let duration = start_time.elapsed();
    reporter.stop().await;

    let summary = RunSummary {
        total: total as u64,
        valid,
        invalid,
        skipped,
    };
    ui::print_summary(&summary, duration);

    Ok(())
}

/// Load the file configuration: explicit --config path, or the data-dir
/// default, or (for the stock data dir) standard-location discovery.
fn load_config(args: &Args, data_dir: &Path) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let manager = ConfigManager::new(args.verbose);

    let config = if let Some(explicit) = &args.config {
        manager
            .load_file(explicit)
            .map_err(|e| format!("Failed to load config file '{}': {}", explicit, e))?
    } else if args.data_dir == DEFAULT_DATA_DIR {
        manager.discover_and_load()?
    } else {
        let path = data_dir.join(CONFIG_FILE);
        manager
            .load_file(&path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path.display(), e))?
    };

    Ok(config)
}

/// Apply CLI overrides on top of the file configuration.
fn build_config(args: &Args, file_config: FileConfig) -> CheckerConfig {
    let mut config = file_config.into_checker_config();

    if let Some(threads) = args.threads {
        config = config.with_workers(threads);
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout(std::time::Duration::from_secs(timeout));
    }
    if args.no_retry {
        config = config.with_retry(false);
    }
    if let Some(webhook) = &args.webhook {
        config = config.with_webhook(webhook.clone());
    }

    config
}

/// Resolve the candidate list: an explicit --file wins over the config's
/// custom-vs-generated choice.
fn resolve_usernames(
    args: &Args,
    file_config: &FileConfig,
    data_dir: &Path,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let usernames = if let Some(file) = &args.file {
        read_name_list(file)?
    } else {
        file_config.resolve_usernames(data_dir.join(USERNAMES_FILE))?
    };

    if args.verbose {
        eprintln!("Usernames loaded: {}", usernames.len());
    }

    Ok(usernames)
}
