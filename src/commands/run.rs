//! One-shot search command: fetch every site, extract, aggregate, render.

use crate::config::{Config, SiteConfig};
use crate::filters::{FilterChain, FilterChainBuilder};
use crate::format::Formatter;
use crate::report::RunResult;
use crate::scout::{build_search_url, Extractor, HttpFetcher, PageFetcher, SiteOutcome};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

/// Executes a price search across all configured sites.
pub struct RunCommand {
    config: Config,
}

impl RunCommand {
    /// Creates a new run command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the search and returns formatted output.
    pub async fn execute(&self, query: &str) -> Result<String> {
        let fetcher = HttpFetcher::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_fetcher(&fetcher, query).await
    }

    /// Executes the search with a provided fetcher (for testing).
    pub async fn execute_with_fetcher(
        &self,
        fetcher: &impl PageFetcher,
        query: &str,
    ) -> Result<String> {
        let sites = self.config.sites.clone();
        let run = run_query(fetcher, &self.config, &sites, query).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_run(&run))
    }
}

/// Runs one query over a snapshot of sites and aggregates the outcomes.
///
/// Aggregation happens only after every site has resolved; a partial result
/// is never reported.
pub async fn run_query(
    fetcher: &impl PageFetcher,
    config: &Config,
    sites: &[SiteConfig],
    query: &str,
) -> Result<RunResult> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("search query must not be empty");
    }

    info!("Searching {} sites for: {}", sites.len(), query);

    let filters = FilterChainBuilder::new()
        .price_range(config.min_price, config.max_price)
        .match_title(config.match_title.then_some(query))
        .build();

    if !filters.is_empty() {
        debug!("Active filters: {}", filters.descriptions().join(", "));
    }

    // buffered, not buffer_unordered: outcomes must stay in site order
    // because the ranking tie-break depends on it.
    let outcomes: Vec<SiteOutcome> = stream::iter(sites.iter())
        .map(|site| scout_site(fetcher, site, query, &filters))
        .buffered(config.concurrency.max(1))
        .collect()
        .await;

    Ok(RunResult::collect(query, outcomes))
}

/// Fetch-then-extract for one site. Every failure comes back as data so one
/// dead site cannot abort the others.
async fn scout_site(
    fetcher: &impl PageFetcher,
    site: &SiteConfig,
    query: &str,
    filters: &FilterChain,
) -> SiteOutcome {
    if let Err(e) = site.validate() {
        warn!("{}", e);
        return SiteOutcome::failure(&site.name, e.to_string());
    }

    let url = match build_search_url(site, query) {
        Ok(url) => url,
        Err(e) => {
            warn!("{}", e);
            return SiteOutcome::failure(&site.name, e.to_string());
        }
    };

    info!("Fetching {}: {}", site.name, url);

    let html = match fetcher.fetch(&url).await {
        Ok(html) => html,
        Err(e) => {
            warn!("{}: fetch failed: {:#}", site.name, e);
            return SiteOutcome::failure(&site.name, format!("{:#}", e));
        }
    };

    match Extractor::new(site).extract(&html, &url) {
        Ok(listings) => {
            let kept = filters.apply(listings);
            debug!("{}: {} listings kept", site.name, kept.len());
            SiteOutcome::success(&site.name, kept)
        }
        Err(e) => {
            warn!("{}", e);
            SiteOutcome::failure(&site.name, e.to_string())
        }
    }
}
