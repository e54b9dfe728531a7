use crate::selector::CssSelector;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::{Validate, ValidationError};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzerConfig {
    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1))]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 120))]
    pub timeout_secs: u64,

    #[serde(default = "default_search_url")]
    #[validate(custom = "validate_http_url")]
    pub search_url: String,

    /// Interface language passed to the search engine as `hl`.
    #[serde(default = "default_language")]
    #[validate(length(min = 1))]
    pub language: String,

    /// How many competitor results to compare against.
    #[serde(default = "default_results")]
    #[validate(range(min = 1, max = 20))]
    pub results: usize,

    #[serde(default)]
    pub result_container: CssSelector,

    /// Fixed competitor list. When non-empty, search discovery is skipped.
    #[serde(default)]
    pub competitor_urls: Vec<String>,

    /// Competitor pages fetched at once. 1 keeps fetches strictly sequential.
    #[serde(default = "default_concurrency")]
    #[validate(range(min = 1, max = 16))]
    pub concurrency: usize,

    #[serde(default)]
    pub output: Option<OutputConfig>,

    /// Optional path to a parent configuration file to inherit from
    #[serde(default)]
    pub extends: Option<String>,
}

impl AnalyzerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            search_url: default_search_url(),
            language: default_language(),
            results: default_results(),
            result_container: CssSelector::default(),
            competitor_urls: Vec::new(),
            concurrency: default_concurrency(),
            output: None,
            extends: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputConfig {
    Console,
    Json { path: String },
}

fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => Err(ValidationError::new("http_url")),
    }
}

pub(crate) fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    10
}

pub(crate) fn default_search_url() -> String {
    "https://www.google.com/search".to_string()
}

pub(crate) fn default_language() -> String {
    "en".to_string()
}

pub(crate) fn default_results() -> usize {
    5
}

pub(crate) fn default_concurrency() -> usize {
    1
}
