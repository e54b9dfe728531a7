use crate::error::{Error, Result};
use crate::metrics::collector::MetricsCollector;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Single-page HTTP fetcher. One client is shared for every page of an
/// analysis so connections to the same host are pooled.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    metrics: MetricsCollector,
}

impl PageFetcher {
    pub fn new(user_agent: &str, timeout: Duration, metrics: MetricsCollector) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, metrics })
    }

    /// GET `url` and return the body. Non-success statuses are errors.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let start = Instant::now();
        let result = self.get_text(url).await;
        match &result {
            Ok(_) => self.metrics.record_success(start.elapsed()),
            Err(_) => self.metrics.record_failure(start.elapsed()),
        }
        result
    }

    /// GET `url` with extra query parameters appended.
    pub async fn fetch_with_query(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = reqwest::Url::parse_with_params(url, query)
            .map_err(|e| Error::Config(format!("{}: {}", url, e)))?;
        self.fetch(url.as_str()).await
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        log::info!("Visiting: {}", url);

        let res = self.client.get(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = res.text().await?;
        log::debug!("HTML length: {} bytes from {}", html.len(), url);
        Ok(html)
    }
}
