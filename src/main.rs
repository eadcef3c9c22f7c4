//! Shiori-Harvest main entry point
//!
//! This is the command-line interface for the Shiori-Harvest bookmark harvester.

use anyhow::Context;
use clap::Parser;
use shiori_harvest::config::{hash_config_content, parse_config, validate, Config};
use shiori_harvest::output::{
    generate_markdown_summary, load_result, print_statistics, write_result, HarvestStatistics,
};
use shiori_harvest::{CombinedResult, Harvester};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shiori-Harvest: a paginated bookmark collection harvester
///
/// Shiori-Harvest walks a remote bookmark collection page by page, writes the
/// combined collection as JSON, and optionally checks that every bookmarked
/// URL is still reachable.
#[derive(Parser, Debug)]
#[command(name = "shiori-harvest")]
#[command(version)]
#[command(about = "A paginated bookmark collection harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Read pages from a directory instead of the network
    #[arg(long, value_name = "DIR")]
    replay: Option<PathBuf>,

    /// Save every fetched page into a directory
    #[arg(long, value_name = "DIR")]
    archive: Option<PathBuf>,

    /// Skip URL verification even if the configuration enables it
    #[arg(long)]
    no_verify: bool,

    /// Write the combined result to this path instead of the configured one
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics for an existing result file and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Generate markdown summary from an existing result file and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.replay {
            config.source.replay_dir = Some(dir.clone());
            config.source.endpoint = None;
        }
        if let Some(dir) = &self.archive {
            config.source.archive_dir = Some(dir.clone());
        }
        if self.no_verify {
            config.verification.check_urls = false;
        }
        if let Some(path) = &self.output {
            config.output.result_path = path.display().to_string();
        }
        if self.verbose > 0 {
            config.logging.verbose = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config(&cli) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config, &config_hash)?;
    } else {
        handle_harvest(&config, &config_hash).await?;
    }

    Ok(())
}

/// Reads the configuration file, applies overrides and validates the result
fn load_config(cli: &Cli) -> anyhow::Result<(Config, String)> {
    let content = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("Failed to read {}", cli.config.display()))?;
    let mut config = parse_config(&content)?;
    cli.apply_overrides(&mut config);
    validate(&config)?;

    Ok((config, hash_config_content(&content)))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shiori_harvest=info,warn"),
            1 => EnvFilter::new("shiori_harvest=debug,info"),
            2 => EnvFilter::new("shiori_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be harvested
fn handle_dry_run(config: &Config) {
    println!("=== Shiori-Harvest Dry Run ===\n");

    println!("Account:");
    println!("  ID: {}", config.account.id);
    println!("  Title: {}", config.account.display_title());

    println!("\nSource:");
    match &config.source.replay_dir {
        Some(dir) => println!("  Replay directory: {}", dir.display()),
        None => println!("  Endpoint: {}", config.source.effective_endpoint()),
    }
    println!("  Format: {:?}", config.source.format);
    println!("  First page: {}", config.source.first_page);
    println!("  Request timeout: {}s", config.source.timeout_secs);
    match config.source.max_pages {
        Some(limit) => println!("  Max pages: {}", limit),
        None => println!("  Max pages: unbounded"),
    }
    if let Some(dir) = &config.source.archive_dir {
        println!("  Archive directory: {}", dir.display());
    }

    println!("\nVerification:");
    if config.verification.is_enabled() {
        println!("  URL check: enabled");
        println!("  Timeout: {}s", config.verification.timeout_secs);
    } else {
        println!("  URL check: disabled");
    }

    println!("\nOutput:");
    println!("  Result: {}", config.output.result_path);
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics for an existing result
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.result_path);
    println!("Result: {}\n", path.display());

    let result =
        load_result(path).with_context(|| format!("Failed to load {}", path.display()))?;
    print_statistics(&HarvestStatistics::from_result(&result));

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    let summary_path = config
        .output
        .summary_path
        .as_deref()
        .context("No summary-path configured")?;
    let result_path = Path::new(&config.output.result_path);

    println!("=== Exporting Harvest Summary ===\n");
    println!("Result: {}", result_path.display());
    println!("Output: {}", summary_path);
    println!();

    tracing::info!("Loading harvest result...");
    let result = load_result(result_path)
        .with_context(|| format!("Failed to load {}", result_path.display()))?;

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&result, Some(config_hash), Path::new(summary_path))?;

    println!("✓ Summary exported to: {}", summary_path);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Harvesting '{}' (verification: {})",
        config.account.display_title(),
        if config.verification.is_enabled() {
            "on"
        } else {
            "off"
        }
    );

    let harvester = Harvester::from_config(config)?;
    let outcome = match harvester.fetch().await {
        Ok(result) => write_outputs(config, config_hash, &result),
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    };

    // Archive writes are lost if the process exits first
    let pending = harvester.pending_archives();
    if pending > 0 {
        tracing::info!("Waiting for {} archive writes...", pending);
        harvester.settle_archives().await;
    }

    outcome
}

/// Writes the result file and summary and prints statistics
fn write_outputs(config: &Config, config_hash: &str, result: &CombinedResult) -> anyhow::Result<()> {
    write_result(result, Path::new(&config.output.result_path))?;

    if let Some(summary_path) = &config.output.summary_path {
        generate_markdown_summary(result, Some(config_hash), Path::new(summary_path))?;
        tracing::info!("Summary written to {}", summary_path);
    }

    print_statistics(&HarvestStatistics::from_result(result));
    tracing::info!("Harvest completed successfully");

    Ok(())
}
