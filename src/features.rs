use crate::document::{HeadingCounts, PageDocument};
use crate::fetcher::PageFetcher;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DOMAIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://([^/]+)").expect("valid domain pattern"));

/// On-page SEO signals for one page and one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFeatures {
    pub url: String,
    pub word_count: usize,
    pub keyword_count: usize,
    /// Percentage, rounded to 2 decimals. Not clamped: substring matching
    /// can push it past 100 on degenerate text.
    pub keyword_density: f64,
    pub headings: HeadingCounts,
    pub internal_links: usize,
    pub external_links: usize,
    pub images: usize,
    pub images_with_alt: usize,
    pub alt_text_coverage_percent: f64,
}

/// A page that could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedPage {
    pub url: String,
    pub error: String,
}

/// Result of extracting one page. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageOutcome {
    Extracted(PageFeatures),
    Failed(FailedPage),
}

impl PageOutcome {
    pub fn url(&self) -> &str {
        match self {
            PageOutcome::Extracted(features) => &features.url,
            PageOutcome::Failed(failed) => &failed.url,
        }
    }

    pub fn features(&self) -> Option<&PageFeatures> {
        match self {
            PageOutcome::Extracted(features) => Some(features),
            PageOutcome::Failed(_) => None,
        }
    }
}

impl PageFeatures {
    /// Derive features from already-fetched markup.
    pub fn from_html(url: &str, keyword: &str, html: &str) -> Self {
        Self::from_document(url, keyword, &PageDocument::parse(html))
    }

    pub fn from_document(url: &str, keyword: &str, doc: &PageDocument) -> Self {
        let word_count = doc.words().count();
        let keyword_count =
            count_overlapping(&doc.text.to_lowercase(), &keyword.to_lowercase());

        // An empty domain is a substring of every href, so every anchor
        // lands in the internal bucket. Relative hrefs that do not contain
        // the domain are counted in neither bucket.
        let domain = extract_domain(url);
        let internal_links = doc
            .anchor_hrefs
            .iter()
            .filter(|href| href.contains(domain))
            .count();
        let external_links = doc
            .anchor_hrefs
            .iter()
            .filter(|href| !href.contains(domain) && href.starts_with("http"))
            .count();

        let images = doc.images.len();
        let images_with_alt = doc.images.iter().filter(|img| img.has_alt()).count();

        Self {
            url: url.to_string(),
            word_count,
            keyword_count,
            keyword_density: round2(percentage(keyword_count, word_count)),
            headings: doc.headings,
            internal_links,
            external_links,
            images,
            images_with_alt,
            alt_text_coverage_percent: round2(percentage(images_with_alt, images)),
        }
    }
}

/// Fetches pages and turns them into [`PageOutcome`]s.
#[derive(Clone)]
pub struct FeatureExtractor {
    fetcher: PageFetcher,
}

impl FeatureExtractor {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }

    /// Never fails: fetch errors come back as [`PageOutcome::Failed`].
    pub async fn extract(&self, url: &str, keyword: &str) -> PageOutcome {
        match self.fetcher.fetch(url).await {
            Ok(html) => {
                let features = PageFeatures::from_html(url, keyword, &html);
                log::debug!(
                    "{}: {} words, keyword density {}%",
                    url,
                    features.word_count,
                    features.keyword_density
                );
                PageOutcome::Extracted(features)
            }
            Err(e) => {
                log::warn!("Failed to extract {}: {}", url, e);
                PageOutcome::Failed(FailedPage {
                    url: url.to_string(),
                    error: e.to_string(),
                })
            }
        }
    }
}

/// Host (with port, if any) of the first `scheme://host` in `url`, or "".
pub fn extract_domain(url: &str) -> &str {
    DOMAIN_PATTERN
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Occurrences of `needle` in `haystack`, matches allowed to overlap.
pub fn count_overlapping(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        count += 1;
        let hit = start + pos;
        let step = haystack[hit..].chars().next().map_or(1, char::len_utf8);
        start = hit + step;
    }
    count
}
