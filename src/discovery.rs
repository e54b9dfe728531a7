use crate::error::{Error, Result};
use crate::fetcher::PageFetcher;
use crate::selector::CssSelector;
use async_trait::async_trait;
use select::document::Document;
use select::predicate::{Attr, Name, Predicate};

/// Source of competitor URLs for a keyword.
#[async_trait]
pub trait Discoverer: Send + Sync {
    fn name(&self) -> String;

    /// Up to `n` absolute URLs, best-ranked first.
    async fn discover(&self, keyword: &str, n: usize) -> Result<Vec<String>>;
}

/// Scrapes organic results from a search engine results page.
pub struct SearchDiscoverer {
    fetcher: PageFetcher,
    search_url: String,
    language: String,
    result_container: CssSelector,
}

impl SearchDiscoverer {
    pub fn new(
        fetcher: PageFetcher,
        search_url: String,
        language: String,
        result_container: CssSelector,
    ) -> Self {
        Self {
            fetcher,
            search_url,
            language,
            result_container,
        }
    }
}

#[async_trait]
impl Discoverer for SearchDiscoverer {
    fn name(&self) -> String {
        "search".to_string()
    }

    async fn discover(&self, keyword: &str, n: usize) -> Result<Vec<String>> {
        let query = [("q", keyword), ("hl", self.language.as_str())];
        let html = self
            .fetcher
            .fetch_with_query(&self.search_url, &query)
            .await
            .map_err(|e| Error::Discovery(e.to_string()))?;

        let urls = parse_results(&html, &self.result_container, n);
        log::info!("Discovered {} competitor URLs for '{}'", urls.len(), keyword);
        Ok(urls)
    }
}

/// Returns a fixed, pre-configured competitor list.
pub struct StaticDiscoverer {
    urls: Vec<String>,
}

impl StaticDiscoverer {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }
}

#[async_trait]
impl Discoverer for StaticDiscoverer {
    fn name(&self) -> String {
        "static".to_string()
    }

    async fn discover(&self, _keyword: &str, n: usize) -> Result<Vec<String>> {
        Ok(self.urls.iter().take(n).cloned().collect())
    }
}

/// First anchor href of each result container, kept when it is an
/// absolute http(s) link. Stops after `n` links.
pub fn parse_results(html: &str, container: &CssSelector, n: usize) -> Vec<String> {
    let doc = Document::from(html);
    let containers = doc.find(container).collect::<Vec<_>>();
    log::debug!("Result selector '{}' found {} matches", container, containers.len());

    containers
        .iter()
        .filter_map(|node| node.find(Name("a").and(Attr("href", ()))).next())
        .filter_map(|anchor| anchor.attr("href"))
        .filter(|href| href.starts_with("http"))
        .take(n)
        .map(|href| href.to_string())
        .collect()
}
