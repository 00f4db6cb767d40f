//! price-scout - Multi-site lowest-price finder CLI
//!
//! Fetches each configured site's search page for a query, extracts product
//! listings with user-supplied CSS selectors, and reports the lowest price.

use anyhow::Result;
use clap::{Parser, Subcommand};
use price_scout::commands::{RunCommand, ShellCommand};
use price_scout::config::{Config, OutputFormat};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "price-scout",
    version,
    about = "Multi-site lowest-price finder",
    long_about = "Define e-commerce sites at runtime (URL template + CSS selectors), \
                  search them all for an item, and report the lowest price found."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Per-request timeout in seconds (5-60)
    #[arg(long, global = true, env = "SCOUT_TIMEOUT")]
    timeout: Option<u64>,

    /// Maximum sites fetched in flight at once
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Courtesy delay before each request in milliseconds
    #[arg(long, global = true, env = "SCOUT_DELAY")]
    delay: Option<u64>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SCOUT_PROXY")]
    proxy: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search all configured sites for an item
    #[command(alias = "s")]
    Search {
        /// Search query
        query: String,

        /// Maximum results taken per site
        #[arg(short, long)]
        max: Option<usize>,

        /// Minimum price filter
        #[arg(long)]
        min_price: Option<f64>,

        /// Maximum price filter
        #[arg(long)]
        max_price: Option<f64>,

        /// Keep listings whose title does not contain the query
        #[arg(long)]
        any_title: bool,
    },

    /// List the configured sites
    Sites,

    /// Interactive session: edit sites and run repeated searches
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;

    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout.clamp(5, 60);
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Search { query, max, min_price, max_price, any_title } => {
            if let Some(max) = max {
                for site in &mut config.sites {
                    site.max_results = max;
                }
            }
            config.min_price = min_price;
            config.max_price = max_price;
            if any_title {
                config.match_title = false;
            }

            if config.sites.is_empty() {
                anyhow::bail!(
                    "No sites configured. Add [[sites]] entries to price-scout.toml \
                     or use the interactive shell."
                );
            }

            let cmd = RunCommand::new(config);
            let output = cmd.execute(&query).await?;
            println!("{}", output);
        }

        Commands::Sites => {
            if config.sites.is_empty() {
                println!("No sites configured.");
            } else {
                println!("{:<3} {:<16} {:<40} {}", "#", "Name", "URL template", "Card selector");
                println!("{:-<3} {:-<16} {:-<40} {:-<20}", "", "", "", "");

                for (i, site) in config.sites.iter().enumerate() {
                    println!(
                        "{:<3} {:<16} {:<40} {}",
                        i + 1,
                        site.name,
                        site.url_template,
                        site.card_selector
                    );
                }
            }
        }

        Commands::Shell => {
            ShellCommand::new(config).run().await?;
        }
    }

    Ok(())
}
