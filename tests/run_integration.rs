//! Integration tests driving extraction and aggregation over fixture HTML.

use anyhow::Result;
use async_trait::async_trait;
use price_scout::commands::run::run_query;
use price_scout::config::{Config, SiteConfig};
use price_scout::scout::{Extractor, PageFetcher};
use std::collections::HashMap;

const SEARCH_FIXTURE: &str = include_str!("fixtures/shop_search.html");

fn shoptest_site() -> SiteConfig {
    SiteConfig {
        name: "ShopTest".to_string(),
        url_template: "https://shoptest.example/search?q={query}".to_string(),
        card_selector: ".product-card".to_string(),
        title_selector: ".title".to_string(),
        price_selector: ".price".to_string(),
        link_selector: "a.product-link".to_string(),
        currency_hint: None,
        max_results: 10,
    }
}

#[test]
fn test_extract_fixture_page() {
    let site = shoptest_site();
    let listings = Extractor::new(&site)
        .extract(SEARCH_FIXTURE, "https://shoptest.example/search?q=wireless+mouse")
        .unwrap();

    // Two priced cards, the out-of-stock and untitled cards skipped, plus
    // one JSON-LD offer.
    assert_eq!(listings.len(), 3);

    assert_eq!(listings[0].title, "Wireless Mouse Pro 2.4GHz");
    assert_eq!(listings[0].price, 24.99);
    assert_eq!(listings[0].currency.as_deref(), Some("GBP"));
    assert_eq!(
        listings[0].url.as_deref(),
        Some("https://shoptest.example/products/wireless-mouse-pro")
    );

    assert_eq!(listings[1].title, "Wireless Mouse Lite");
    assert_eq!(listings[1].price, 18.50);
    assert_eq!(
        listings[1].url.as_deref(),
        Some("https://cdn.shoptest.example/products/wireless-mouse-lite")
    );

    assert_eq!(listings[2].title, "Wireless Mouse Compact");
    assert_eq!(listings[2].price, 17.25);
    assert_eq!(
        listings[2].url.as_deref(),
        Some("https://shoptest.example/products/wireless-mouse-compact")
    );
}

#[test]
fn test_extract_fixture_twice_is_identical() {
    let site = shoptest_site();
    let extractor = Extractor::new(&site);
    let base = "https://shoptest.example/search?q=wireless+mouse";

    let first = extractor.extract(SEARCH_FIXTURE, base).unwrap();
    let second = extractor.extract(SEARCH_FIXTURE, base).unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.title, b.title);
        assert_eq!(a.price, b.price);
        assert_eq!(a.currency, b.currency);
        assert_eq!(a.url, b.url);
    }
}

/// Serves canned pages by URL; unknown URLs behave like a timed-out site.
struct FixtureFetcher {
    pages: HashMap<String, String>,
}

impl FixtureFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self { pages: pages.iter().map(|(u, b)| (u.to_string(), b.to_string())).collect() }
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        match self.pages.get(url) {
            Some(body) => Ok(body.clone()),
            None => anyhow::bail!("request timed out after 20s"),
        }
    }
}

fn test_config(sites: Vec<SiteConfig>) -> Config {
    Config { sites, delay_ms: 0, delay_jitter_ms: 0, ..Config::default() }
}

fn simple_site(name: &str, host: &str) -> SiteConfig {
    SiteConfig {
        name: name.to_string(),
        url_template: format!("https://{}/s?q={{query}}", host),
        card_selector: ".item".to_string(),
        title_selector: ".t".to_string(),
        price_selector: ".p".to_string(),
        link_selector: "a".to_string(),
        currency_hint: None,
        max_results: 10,
    }
}

#[tokio::test]
async fn test_full_run_reports_minimum_across_sites() {
    let shop_a = r#"
        <div class="item"><span class="t">Widget Anvil</span><span class="p">$12.50</span><a href="/a">x</a></div>
        <div class="item"><span class="t">Widget Basic</span><span class="p">$9.99</span><a href="/b">x</a></div>
    "#;
    let shop_b = r#"
        <div class="item"><span class="t">Widget Import</span><span class="p">$11.00</span><a href="/c">x</a></div>
    "#;

    let fetcher = FixtureFetcher::new(&[
        ("https://a.test/s?q=widget", shop_a),
        ("https://b.test/s?q=widget", shop_b),
    ]);

    let sites = vec![simple_site("ShopA", "a.test"), simple_site("ShopB", "b.test")];
    let config = test_config(sites.clone());

    let run = run_query(&fetcher, &config, &sites, "widget").await.unwrap();

    assert_eq!(run.count(), 3);
    assert!(run.errors.is_empty());

    let best = run.best().unwrap();
    assert_eq!(best.price, 9.99);
    assert_eq!(best.site, "ShopA");
    assert_eq!(best.title, "Widget Basic");

    // The minimum really is the minimum.
    assert!(run.listings.iter().all(|l| best.price <= l.price));
}

#[tokio::test]
async fn test_one_site_down_one_listing_survives() {
    let shop_a = r#"<div class="item"><span class="t">Widget</span><span class="p">$5.00</span></div>"#;

    let fetcher = FixtureFetcher::new(&[("https://a.test/s?q=widget", shop_a)]);

    let sites = vec![simple_site("Alive", "a.test"), simple_site("SlowShop", "slow.test")];
    let config = test_config(sites.clone());

    let run = run_query(&fetcher, &config, &sites, "widget").await.unwrap();

    assert_eq!(run.count(), 1);
    assert_eq!(run.best().unwrap().price, 5.00);

    assert_eq!(run.errors.len(), 1);
    assert_eq!(run.errors[0].site, "SlowShop");
    assert!(run.errors[0].reason.contains("timed out"));
}

#[tokio::test]
async fn test_every_site_down_yields_errors_not_a_crash() {
    let fetcher = FixtureFetcher::new(&[]);
    let sites = vec![simple_site("A", "a.test"), simple_site("B", "b.test")];
    let config = test_config(sites.clone());

    let run = run_query(&fetcher, &config, &sites, "widget").await.unwrap();

    assert!(run.is_empty());
    assert!(run.best().is_none());
    assert_eq!(run.errors.len(), 2);
}

#[tokio::test]
async fn test_title_relevance_filter_in_full_run() {
    let shop = r#"
        <div class="item"><span class="t">Widget Deluxe</span><span class="p">$9.00</span></div>
        <div class="item"><span class="t">Completely Different Gadget</span><span class="p">$1.00</span></div>
    "#;

    let fetcher = FixtureFetcher::new(&[("https://a.test/s?q=widget", shop)]);
    let sites = vec![simple_site("ShopA", "a.test")];
    let config = test_config(sites.clone());

    // match_title defaults on: the cheap but irrelevant gadget is dropped.
    let run = run_query(&fetcher, &config, &sites, "widget").await.unwrap();
    assert_eq!(run.count(), 1);
    assert_eq!(run.best().unwrap().title, "Widget Deluxe");

    let mut any_title = test_config(sites.clone());
    any_title.match_title = false;

    let run = run_query(&fetcher, &any_title, &sites, "widget").await.unwrap();
    assert_eq!(run.count(), 2);
    assert_eq!(run.best().unwrap().price, 1.00);
}
