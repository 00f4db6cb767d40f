//! Interactive session: edit the site registry and run repeated searches.

use crate::commands::run::run_query;
use crate::config::{Config, OutputFormat, SiteConfig};
use crate::format::Formatter;
use crate::registry::SiteRegistry;
use crate::scout::HttpFetcher;
use anyhow::Result;
use std::io::{BufRead, Write};

/// Runs the interactive shell until `quit` or EOF.
pub struct ShellCommand {
    config: Config,
}

impl ShellCommand {
    /// Creates a new shell command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Enters the read-eval loop on stdin/stdout.
    pub async fn run(mut self) -> Result<()> {
        let mut registry = SiteRegistry::from_sites(std::mem::take(&mut self.config.sites));

        if registry.is_empty() {
            // Seed one editable example so `sites` shows the expected shape.
            registry.add(SiteConfig::example())?;
            println!("No sites configured; seeded an example. Edit it before searching.\n");
        }

        println!("{}", help_text());

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        loop {
            print!("scout> ");
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break; // EOF
            }

            let line = line.trim();
            let (command, rest) = split_command(line);

            match command {
                "" => {}
                "help" => println!("{}", help_text()),
                "sites" | "list" => println!("{}", render_sites(&registry)),
                "add" => {
                    let site = prompt_site(&stdin, None)?;
                    match registry.add(site) {
                        Ok(()) => println!("Added."),
                        Err(e) => println!("Not added: {}", e),
                    }
                }
                "edit" => match parse_index(rest, registry.len()) {
                    Some(index) => {
                        let current = registry.get(index).cloned();
                        let site = prompt_site(&stdin, current.as_ref())?;
                        match registry.update(index, site) {
                            Ok(()) => println!("Updated."),
                            Err(e) => println!("Not updated: {}", e),
                        }
                    }
                    None => println!("Usage: edit <n>   (see `sites` for numbers)"),
                },
                "remove" => match parse_index(rest, registry.len()) {
                    Some(index) => {
                        let removed = registry.remove(index);
                        println!("Removed {}.", removed.map(|s| s.name).unwrap_or_default());
                    }
                    None => println!("Usage: remove <n>   (see `sites` for numbers)"),
                },
                "format" => match rest.parse::<OutputFormat>() {
                    Ok(format) => {
                        self.config.format = format;
                        println!("Output format: {}", format);
                    }
                    Err(e) => println!("{}", e),
                },
                "search" => {
                    if registry.is_empty() {
                        println!("No sites configured. Use `add` first.");
                        continue;
                    }
                    match self.search(&registry, rest).await {
                        Ok(output) => println!("{}", output),
                        Err(e) => println!("Search failed: {:#}", e),
                    }
                }
                "quit" | "exit" => break,
                other => println!("Unknown command: {}. Try `help`.", other),
            }
        }

        Ok(())
    }

    /// Runs one query over a snapshot of the registry.
    async fn search(&self, registry: &SiteRegistry, query: &str) -> Result<String> {
        let fetcher = HttpFetcher::new(&self.config)?;
        let sites = registry.snapshot();

        let run = run_query(&fetcher, &self.config, &sites, query).await?;
        Ok(Formatter::new(self.config.format).format_run(&run))
    }
}

fn help_text() -> &'static str {
    "Commands:\n\
     \x20 sites            list configured sites\n\
     \x20 add              add a site (prompts per field)\n\
     \x20 edit <n>         edit site n (empty input keeps the current value)\n\
     \x20 remove <n>       remove site n\n\
     \x20 search <query>   search all sites and report the lowest price\n\
     \x20 format <fmt>     set output format (table, json, markdown, csv)\n\
     \x20 quit             leave the shell"
}

/// Splits a line into its command word and the remainder.
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

/// Parses a 1-based site number into a registry index.
fn parse_index(text: &str, len: usize) -> Option<usize> {
    let n: usize = text.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

/// Renders the registry as a numbered table.
fn render_sites(registry: &SiteRegistry) -> String {
    if registry.is_empty() {
        return "No sites configured.".to_string();
    }

    let mut lines = Vec::new();
    lines.push(format!("{:<3} {:<16} {:<40} {}", "#", "Name", "URL template", "Card selector"));
    lines.push(format!("{:-<3} {:-<16} {:-<40} {:-<20}", "", "", "", ""));

    for (i, site) in registry.iter().enumerate() {
        lines.push(format!(
            "{:<3} {:<16} {:<40} {}",
            i + 1,
            site.name,
            site.url_template,
            site.card_selector
        ));
    }

    lines.join("\n")
}

/// Prompts for every site field; with a current site, empty input keeps the
/// existing value.
fn prompt_site(stdin: &std::io::Stdin, current: Option<&SiteConfig>) -> Result<SiteConfig> {
    let defaults = current.cloned().unwrap_or_else(|| SiteConfig {
        name: String::new(),
        url_template: String::new(),
        card_selector: String::new(),
        title_selector: String::new(),
        price_selector: String::new(),
        link_selector: String::new(),
        currency_hint: None,
        max_results: 10,
    });

    let name = prompt_field(stdin, "Site name", &defaults.name)?;
    let url_template =
        prompt_field(stdin, "Search URL template (must include {query})", &defaults.url_template)?;
    let card_selector = prompt_field(stdin, "Result card selector (CSS)", &defaults.card_selector)?;
    let title_selector = prompt_field(stdin, "Title selector (CSS)", &defaults.title_selector)?;
    let price_selector = prompt_field(stdin, "Price selector (CSS)", &defaults.price_selector)?;
    let link_selector = prompt_field(stdin, "Link selector (CSS)", &defaults.link_selector)?;

    let currency_default = defaults.currency_hint.clone().unwrap_or_default();
    let currency = prompt_field(stdin, "Currency hint (optional)", &currency_default)?;

    let max_default = defaults.max_results.to_string();
    let max_results =
        prompt_field(stdin, "Max results", &max_default)?.parse().unwrap_or(defaults.max_results);

    Ok(SiteConfig {
        name,
        url_template,
        card_selector,
        title_selector,
        price_selector,
        link_selector,
        currency_hint: if currency.is_empty() { None } else { Some(currency) },
        max_results,
    })
}

fn prompt_field(stdin: &std::io::Stdin, label: &str, default: &str) -> Result<String> {
    if default.is_empty() {
        print!("  {}: ", label);
    } else {
        print!("  {} [{}]: ", label, default);
    }
    std::io::stdout().flush()?;

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;

    let entered = line.trim();
    Ok(if entered.is_empty() { default.to_string() } else { entered.to_string() })
}
