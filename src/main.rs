//! Sitetree main entry point
//!
//! Command-line interface for crawling a site and writing its JSON tree.

use anyhow::Context;
use clap::Parser;
use sitetree::{crawl, CrawlConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Crawl a website and map it as a JSON tree
///
/// Starting from URL, sitetree visits every linked page under the same
/// scope, recording each page's title, outbound links, and images.
#[derive(Parser, Debug)]
#[command(name = "sitetree")]
#[command(version)]
#[command(about = "Crawl a website and map it as a JSON tree", long_about = None)]
struct Cli {
    /// The root URL to crawl
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum depth to traverse from the root
    #[arg(short, long)]
    depth: Option<u32>,

    /// Number of concurrent workers (defaults to available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Extra fetch attempts for failed requests
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Stop after this many seconds, keeping the partial tree
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Output path for the site tree
    #[arg(short, long, default_value = "outputs/sitetree.json")]
    output: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = CrawlConfig::new(&cli.url);
    config.max_depth = cli.depth;
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    config.fetch_retries = cli.retries;
    config.time_limit = cli.timeout.map(Duration::from_secs);

    let tree = crawl(config)
        .await
        .with_context(|| format!("failed to crawl {}", cli.url))?;

    tree.write_to(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    if !cli.quiet {
        println!(
            "Crawled {} pages; tree written to {}",
            tree.len(),
            cli.output.display()
        );
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitetree=info,warn"),
            1 => EnvFilter::new("sitetree=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
