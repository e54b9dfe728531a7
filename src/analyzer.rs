use crate::config::AnalyzerConfig;
use crate::discovery::{Discoverer, SearchDiscoverer, StaticDiscoverer};
use crate::error::{Error, Result};
use crate::features::{FeatureExtractor, PageFeatures, PageOutcome};
use crate::fetcher::PageFetcher;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::snapshot::MetricsSnapshot;
use crate::scorer::{self, ScoreReport};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

/// Everything one analysis run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub keyword: String,
    pub target: PageFeatures,
    /// Every discovered competitor in rank order, failures included.
    pub competitors: Vec<PageOutcome>,
    pub report: ScoreReport,
    pub generated_at: DateTime<Utc>,
}

impl Analysis {
    pub fn scored_competitors(&self) -> impl Iterator<Item = &PageFeatures> {
        self.competitors.iter().filter_map(PageOutcome::features)
    }
}

pub struct Analyzer {
    discoverer: Box<dyn Discoverer>,
    extractor: FeatureExtractor,
    results: usize,
    concurrency: usize,
    metrics: MetricsCollector,
}

impl Analyzer {
    pub fn new(
        discoverer: Box<dyn Discoverer>,
        extractor: FeatureExtractor,
        results: usize,
        concurrency: usize,
        metrics: MetricsCollector,
    ) -> Self {
        Self {
            discoverer,
            extractor,
            results,
            concurrency: concurrency.max(1),
            metrics,
        }
    }

    /// Build an analyzer from config: static discovery when competitor
    /// URLs are configured, search discovery otherwise.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self> {
        let metrics = MetricsCollector::new();
        let fetcher = PageFetcher::new(&config.user_agent, config.timeout(), metrics.clone())?;

        let discoverer: Box<dyn Discoverer> = if config.competitor_urls.is_empty() {
            Box::new(SearchDiscoverer::new(
                fetcher.clone(),
                config.search_url.clone(),
                config.language.clone(),
                config.result_container.clone(),
            ))
        } else {
            Box::new(StaticDiscoverer::new(config.competitor_urls.clone()))
        };

        Ok(Self::new(
            discoverer,
            FeatureExtractor::new(fetcher),
            config.results,
            config.concurrency,
            metrics,
        ))
    }

    pub async fn analyze(&self, keyword: &str, url: &str) -> Result<Analysis> {
        // The keyword is matched as given; only blankness is checked.
        let url = url.trim();
        if keyword.trim().is_empty() || url.is_empty() {
            return Err(Error::InvalidInput(
                "both a keyword and a content URL are required".to_string(),
            ));
        }

        log::info!(
            "Discovering up to {} competitors for '{}' via {}",
            self.results,
            keyword,
            self.discoverer.name()
        );
        let urls = self.discoverer.discover(keyword, self.results).await?;
        if urls.is_empty() {
            return Err(Error::EmptyCompetitorSet);
        }

        let competitors = self.extract_all(&urls, keyword).await;

        let target = match self.extractor.extract(url, keyword).await {
            PageOutcome::Extracted(features) => features,
            PageOutcome::Failed(failed) => {
                return Err(Error::TargetUnavailable {
                    url: failed.url,
                    reason: failed.error,
                });
            }
        };

        let scored: Vec<PageFeatures> = competitors
            .iter()
            .filter_map(PageOutcome::features)
            .cloned()
            .collect();
        if scored.len() < competitors.len() {
            log::warn!(
                "{} of {} competitor pages could not be analyzed",
                competitors.len() - scored.len(),
                competitors.len()
            );
        }

        let report = scorer::score(&target, &scored)?;
        log::info!(
            "Scored {} at {} / 100 with {} suggestions",
            target.url,
            report.score,
            report.suggestions.len()
        );

        Ok(Analysis {
            keyword: keyword.to_string(),
            target,
            competitors,
            report,
            generated_at: Utc::now(),
        })
    }

    pub fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Extract every URL, keeping input order. At most `concurrency`
    /// fetches are in flight.
    async fn extract_all(&self, urls: &[String], keyword: &str) -> Vec<PageOutcome> {
        stream::iter(urls)
            .map(|url| self.extractor.extract(url, keyword))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
