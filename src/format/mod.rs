//! Output formatting for run results (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::report::RunResult;
use crate::scout::models::Listing;

/// Formats a run's results for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a full run result.
    pub fn format_run(&self, run: &RunResult) -> String {
        match self.format {
            OutputFormat::Json => self.json_run(run),
            OutputFormat::Table => self.table_run(run),
            OutputFormat::Markdown => self.markdown_run(run),
            OutputFormat::Csv => self.csv_run(run),
        }
    }

    // JSON formatting

    fn json_run(&self, run: &RunResult) -> String {
        serde_json::to_string_pretty(run).unwrap_or_else(|_| "{}".to_string())
    }

    // Table formatting

    fn table_run(&self, run: &RunResult) -> String {
        let mut lines = Vec::new();

        if run.is_empty() {
            lines.push(
                "No prices found. Try adjusting selectors; some sites block automated requests."
                    .to_string(),
            );
            Self::push_errors(&mut lines, run);
            return lines.join("\n");
        }

        let site_width = 16;
        let price_width = 14;
        let title_width = 50;

        lines.push(format!(
            "{:<3} {:<site_width$}  {:>price_width$}  {}",
            "#", "Site", "Price", "Title"
        ));
        lines.push(format!(
            "{:-<3} {:-<site_width$}  {:-<price_width$}  {:-<title_width$}",
            "", "", "", ""
        ));

        for (i, listing) in run.listings.iter().enumerate() {
            let marker = if i == 0 { "🏆" } else { "  " };

            lines.push(format!(
                "{:<3} {:<site_width$}  {:>price_width$}  {} {}",
                i + 1,
                truncate(&listing.site, site_width),
                listing.display_price(),
                marker,
                truncate(&display_title(listing), title_width),
            ));
        }

        if let Some(best) = run.best() {
            lines.push(String::new());
            lines.push(format!(
                "Best found: {} — {} ({})",
                best.display_price(),
                display_title(best),
                best.site
            ));
            if let Some(url) = &best.url {
                lines.push(format!("Link: {}", url));
            }
        }

        lines.push(String::new());
        lines.push(format!("Total: {} listings", run.count()));

        Self::push_errors(&mut lines, run);

        lines.join("\n")
    }

    fn push_errors(lines: &mut Vec<String>, run: &RunResult) {
        if run.errors.is_empty() {
            return;
        }

        lines.push(String::new());
        lines.push("Errors (some sites may block scraping):".to_string());
        for error in &run.errors {
            lines.push(format!("  • {}: {}", error.site, error.reason));
        }
    }

    // Markdown formatting

    fn markdown_run(&self, run: &RunResult) -> String {
        let mut lines = Vec::new();

        if run.is_empty() {
            lines.push("*No prices found.*".to_string());
        } else {
            lines.push("| # | Site | Price | Title |".to_string());
            lines.push("|---|------|-------|-------|".to_string());

            for (i, listing) in run.listings.iter().enumerate() {
                let title = truncate(&display_title(listing), 40);
                let cell = match &listing.url {
                    Some(url) => format!("[{}]({})", title, url),
                    None => title,
                };

                let price = if i == 0 {
                    format!("**{}**", listing.display_price())
                } else {
                    listing.display_price()
                };

                lines.push(format!("| {} | {} | {} | {} |", i + 1, listing.site, price, cell));
            }

            lines.push(String::new());
            lines.push(format!("*{} listings found*", run.count()));
        }

        if !run.errors.is_empty() {
            lines.push(String::new());
            for error in &run.errors {
                lines.push(format!("- ⚠️ {}: {}", error.site, error.reason));
            }
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "site,title,price,currency,url".to_string()
    }

    fn csv_run(&self, run: &RunResult) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for listing in &run.listings {
            lines.push(format!(
                "{},{},{},{},{}",
                Self::csv_escape(&listing.site),
                Self::csv_escape(&listing.title),
                listing.price,
                listing.currency.as_deref().unwrap_or(""),
                listing.url.as_deref().unwrap_or(""),
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

fn display_title(listing: &Listing) -> String {
    if listing.title.is_empty() {
        "(untitled offer)".to_string()
    } else {
        listing.title.clone()
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
