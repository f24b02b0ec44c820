use async_trait::async_trait;
use log2::debug;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::config::WalkerConfig;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid anchor selector"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid img selector"));

/// Why a page yielded no links
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanFailure {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("failed to read body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for ScanFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScanFailure::Timeout
        } else {
            ScanFailure::Transport(e.to_string())
        }
    }
}

/// Fetches a page and returns the targets of its image-wrapped anchors.
/// Each call is a fresh fetch.
#[async_trait]
pub trait PageScanner: Send + Sync {
    async fn scan(&self, url: &Url) -> Result<Vec<Url>, ScanFailure>;
}

/// Resolves `href` against the page it was found on.
/// Absolute hrefs come back unchanged.
pub fn resolve_href(href: &str, page_url: &Url) -> Result<Url, url::ParseError> {
    match Url::parse(href) {
        Ok(parsed) if parsed.has_host() => Ok(parsed),
        _ => page_url.join(href.trim()),
    }
}

/// Every `<a href>` that has an `<img>` somewhere below it, resolved against `base`.
/// Duplicates are kept. An href that doesn't resolve to a valid URL (a port above
/// 65535, say) is dropped, so it can never count as a backlink.
pub fn extract_image_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter(|anchor| anchor.select(&IMG_SELECTOR).next().is_some())
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_href(href, base).ok())
        .collect()
}

/// Scans `url`, absorbing any failure into an empty result
pub async fn scan_or_empty(scanner: &dyn PageScanner, url: &Url) -> Vec<Url> {
    match scanner.scan(url).await {
        Ok(links) => links,
        Err(e) => {
            debug!("Scan of {} failed: {}", url, e);
            Vec::new()
        }
    }
}

/// Counters kept by the HTTP scanner
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Every attempt, failed ones included
    pub pages_requested: AtomicUsize,
    pub failures: AtomicUsize,
    pub timeouts: AtomicUsize,
}

impl ScanStats {
    fn record(&self, outcome: &Result<Vec<Url>, ScanFailure>) {
        self.pages_requested.fetch_add(1, Ordering::Relaxed);
        match outcome {
            Ok(_) => {}
            Err(ScanFailure::Timeout) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                self.timeouts.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

/// Scanner backed by reqwest and scraper
pub struct HttpScanner {
    client: Client,
    request_timeout: Duration,
    pub stats: ScanStats,
}

impl HttpScanner {
    pub fn new(config: &WalkerConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            request_timeout: Duration::from_secs(config.request_timeout_sec),
            stats: ScanStats::default(),
        })
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<Url>, ScanFailure> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScanFailure::Status(response.status().as_u16()));
        }

        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ScanFailure::Timeout
            } else {
                ScanFailure::Body(e.to_string())
            }
        })?;

        let links = extract_image_links(&html, url);
        debug!("Found {} image links on page {}", links.len(), url);
        Ok(links)
    }
}

#[async_trait]
impl PageScanner for HttpScanner {
    async fn scan(&self, url: &Url) -> Result<Vec<Url>, ScanFailure> {
        let outcome = self.fetch(url).await;
        self.stats.record(&outcome);
        outcome
    }
}
