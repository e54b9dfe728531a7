use crate::error::{Error, Result};
use crate::features::PageFeatures;
use serde::{Deserialize, Serialize};
use std::fmt;

const KEYWORD_DENSITY_BAND: (f64, f64) = (0.5, 2.5);
const KEYWORD_DENSITY_IDEAL: f64 = 1.5;
const MIN_H2: usize = 3;
const MIN_EXTERNAL_LINKS: usize = 2;
const MIN_ALT_COVERAGE: f64 = 80.0;

/// A scored aspect of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    WordCount,
    KeywordDensity,
    Headings,
    InternalLinks,
    ExternalLinks,
    ImageAltText,
}

impl Dimension {
    /// Evaluation order. Suggestions are reported in this order.
    pub const ORDER: [Dimension; 6] = [
        Dimension::WordCount,
        Dimension::KeywordDensity,
        Dimension::Headings,
        Dimension::InternalLinks,
        Dimension::ExternalLinks,
        Dimension::ImageAltText,
    ];

    pub fn max_points(self) -> f64 {
        match self {
            Dimension::WordCount => 20.0,
            Dimension::KeywordDensity => 15.0,
            Dimension::Headings => 15.0,
            Dimension::InternalLinks => 10.0,
            Dimension::ExternalLinks => 5.0,
            Dimension::ImageAltText => 10.0,
        }
    }

    /// Flat award for the all-or-nothing dimensions when they miss.
    fn partial_points(self) -> f64 {
        match self {
            Dimension::Headings => 7.0,
            Dimension::InternalLinks => 5.0,
            Dimension::ExternalLinks => 2.0,
            Dimension::ImageAltText => 5.0,
            Dimension::WordCount | Dimension::KeywordDensity => 0.0,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::WordCount => "Word count",
            Dimension::KeywordDensity => "Keyword density",
            Dimension::Headings => "Headings",
            Dimension::InternalLinks => "Internal links",
            Dimension::ExternalLinks => "External links",
            Dimension::ImageAltText => "Image alt text",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub dimension: Dimension,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub points: f64,
    pub max_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: u32,
    pub suggestions: Vec<Suggestion>,
    pub breakdown: Vec<DimensionScore>,
}

impl ScoreReport {
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.suggestions.iter().map(|s| s.message.as_str())
    }
}

/// Competitor means the target is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Baseline {
    avg_word_count: f64,
    avg_internal_links: f64,
}

impl Baseline {
    fn from_competitors(competitors: &[PageFeatures]) -> Result<Self> {
        if competitors.is_empty() {
            return Err(Error::EmptyCompetitorSet);
        }
        let n = competitors.len() as f64;
        let words: usize = competitors.iter().map(|c| c.word_count).sum();
        let internal: usize = competitors.iter().map(|c| c.internal_links).sum();
        Ok(Self {
            avg_word_count: words as f64 / n,
            avg_internal_links: internal as f64 / n,
        })
    }
}

/// Score `target` against the mean of `competitors`.
pub fn score(target: &PageFeatures, competitors: &[PageFeatures]) -> Result<ScoreReport> {
    let baseline = Baseline::from_competitors(competitors)?;

    let mut total = 0.0;
    let mut suggestions = Vec::new();
    let mut breakdown = Vec::with_capacity(Dimension::ORDER.len());

    for dimension in Dimension::ORDER {
        let (points, suggestion) = evaluate(dimension, target, &baseline);
        total += points;
        breakdown.push(DimensionScore {
            dimension,
            points,
            max_points: dimension.max_points(),
        });
        if let Some(message) = suggestion {
            suggestions.push(Suggestion { dimension, message });
        }
    }

    Ok(ScoreReport {
        score: total.floor().clamp(0.0, 100.0) as u32,
        suggestions,
        breakdown,
    })
}

fn evaluate(dimension: Dimension, target: &PageFeatures, baseline: &Baseline) -> (f64, Option<String>) {
    let max = dimension.max_points();
    let partial = dimension.partial_points();

    match dimension {
        Dimension::WordCount => {
            let words = target.word_count as f64;
            let avg = baseline.avg_word_count;
            if words >= avg {
                (max, None)
            } else {
                let shortfall = (max * (avg - words) / avg).floor();
                (
                    (max - shortfall).max(0.0),
                    Some(format!(
                        "Word count is below average ({} vs {}).",
                        target.word_count, avg as u64
                    )),
                )
            }
        }
        Dimension::KeywordDensity => {
            let density = target.keyword_density;
            let (low, high) = KEYWORD_DENSITY_BAND;
            if (low..=high).contains(&density) {
                (max, None)
            } else {
                let penalty = ((density - KEYWORD_DENSITY_IDEAL).abs() * 10.0).min(max);
                (
                    (max - penalty).max(0.0),
                    Some(format!(
                        "Keyword density is {}%. Ideal range is {}%–{}%.",
                        format_percent(density),
                        low,
                        high
                    )),
                )
            }
        }
        Dimension::Headings => {
            if target.headings.h1 == 1 && target.headings.h2 >= MIN_H2 {
                (max, None)
            } else {
                (
                    partial,
                    Some(format!(
                        "Use one H1 and at least {} H2s for better structure.",
                        MIN_H2
                    )),
                )
            }
        }
        Dimension::InternalLinks => {
            if target.internal_links as f64 >= baseline.avg_internal_links {
                (max, None)
            } else {
                (
                    partial,
                    Some(format!(
                        "Fewer internal links ({} vs avg {}).",
                        target.internal_links, baseline.avg_internal_links as u64
                    )),
                )
            }
        }
        Dimension::ExternalLinks => {
            if target.external_links >= MIN_EXTERNAL_LINKS {
                (max, None)
            } else {
                (
                    partial,
                    Some("Add 1–2 external links to authority sources.".to_string()),
                )
            }
        }
        Dimension::ImageAltText => {
            if target.alt_text_coverage_percent >= MIN_ALT_COVERAGE {
                (max, None)
            } else {
                (
                    partial,
                    Some(format!(
                        "Add alt text to all images (currently {:.0}%).",
                        target.alt_text_coverage_percent
                    )),
                )
            }
        }
    }
}

/// Whole numbers keep one decimal (`3.0`), everything else prints as-is.
fn format_percent(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HeadingCounts;

    fn page(url: &str, word_count: usize, internal_links: usize) -> PageFeatures {
        PageFeatures {
            url: url.to_string(),
            word_count,
            keyword_count: 0,
            keyword_density: 0.0,
            headings: HeadingCounts::default(),
            internal_links,
            external_links: 0,
            images: 0,
            images_with_alt: 0,
            alt_text_coverage_percent: 0.0,
        }
    }

    fn strong_target() -> PageFeatures {
        PageFeatures {
            url: "https://mine.test/widgets".to_string(),
            word_count: 500,
            keyword_count: 5,
            keyword_density: 1.0,
            headings: HeadingCounts {
                h1: 1,
                h2: 3,
                h3: 0,
                h4: 0,
            },
            internal_links: 10,
            external_links: 3,
            images: 4,
            images_with_alt: 4,
            alt_text_coverage_percent: 100.0,
        }
    }

    fn competitors() -> Vec<PageFeatures> {
        vec![
            page("https://a.test", 300, 6),
            page("https://b.test", 500, 10),
        ]
    }

    #[test]
    fn strong_page_gets_every_dimension_in_full() {
        let report = score(&strong_target(), &competitors()).unwrap();
        assert_eq!(report.score, 75);
        assert!(report.suggestions.is_empty());
        let points: Vec<f64> = report.breakdown.iter().map(|d| d.points).collect();
        assert_eq!(points, vec![20.0, 15.0, 15.0, 10.0, 5.0, 10.0]);
    }

    #[test]
    fn empty_competitor_set_is_an_error() {
        let err = score(&strong_target(), &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyCompetitorSet));
    }

    #[test]
    fn zero_word_target_loses_word_count_points() {
        let mut target = strong_target();
        target.word_count = 0;
        target.keyword_count = 0;
        target.keyword_density = 0.0;

        let report = score(&target, &competitors()).unwrap();
        assert_eq!(report.breakdown[0].points, 0.0);
        // density 0 is 1.5 away from ideal: penalty 15
        assert_eq!(report.breakdown[1].points, 0.0);
        assert_eq!(report.score, 40);
        let messages: Vec<_> = report.messages().collect();
        assert_eq!(
            messages,
            vec![
                "Word count is below average (0 vs 400).",
                "Keyword density is 0.0%. Ideal range is 0.5%–2.5%.",
            ]
        );
    }

    #[test]
    fn word_count_shortfall_is_floored() {
        let mut target = strong_target();
        target.word_count = 330;
        // 20 * 70 / 400 = 3.5, floored to 3
        let report = score(&target, &competitors()).unwrap();
        assert_eq!(report.breakdown[0].points, 17.0);
        assert_eq!(report.suggestions[0].dimension, Dimension::WordCount);
    }

    #[test]
    fn keyword_density_penalty_scales_with_distance() {
        let mut target = strong_target();
        target.keyword_density = 0.25;
        // 1.25 from ideal: penalty 12.5
        let report = score(&target, &competitors()).unwrap();
        assert_eq!(report.breakdown[1].points, 2.5);
        assert_eq!(report.score, 62);
        assert_eq!(
            report.suggestions[0].message,
            "Keyword density is 0.25%. Ideal range is 0.5%–2.5%."
        );

        target.keyword_density = 40.0;
        let report = score(&target, &competitors()).unwrap();
        assert_eq!(report.breakdown[1].points, 0.0);
    }

    #[test]
    fn whole_number_densities_keep_one_decimal() {
        let mut target = strong_target();
        target.keyword_count = 0;
        target.keyword_density = 0.0;
        let report = score(&target, &competitors()).unwrap();
        assert_eq!(
            report.suggestions[0].message,
            "Keyword density is 0.0%. Ideal range is 0.5%–2.5%."
        );

        target.keyword_density = 3.0;
        let report = score(&target, &competitors()).unwrap();
        assert_eq!(
            report.suggestions[0].message,
            "Keyword density is 3.0%. Ideal range is 0.5%–2.5%."
        );
        assert_eq!(format_percent(26.67), "26.67");
    }

    #[test]
    fn band_edges_are_inclusive() {
        for density in [0.5, 2.5] {
            let mut target = strong_target();
            target.keyword_density = density;
            let report = score(&target, &competitors()).unwrap();
            assert!(report.suggestions.is_empty(), "density {}", density);
        }
    }

    #[test]
    fn weak_page_gets_partial_awards_in_fixed_order() {
        let mut target = page("https://mine.test", 100, 2);
        target.keyword_density = 1.2;
        target.headings = HeadingCounts {
            h1: 2,
            h2: 5,
            h3: 0,
            h4: 0,
        };
        target.external_links = 1;
        target.images = 4;
        target.images_with_alt = 1;
        target.alt_text_coverage_percent = 25.0;

        let report = score(&target, &competitors()).unwrap();
        let dims: Vec<Dimension> = report.suggestions.iter().map(|s| s.dimension).collect();
        assert_eq!(
            dims,
            vec![
                Dimension::WordCount,
                Dimension::Headings,
                Dimension::InternalLinks,
                Dimension::ExternalLinks,
                Dimension::ImageAltText,
            ]
        );
        // word count: 20 - floor(20 * 300 / 400) = 5
        assert_eq!(report.score, 5 + 15 + 7 + 5 + 2 + 5);
        let messages: Vec<_> = report.messages().collect();
        assert_eq!(messages[1], "Use one H1 and at least 3 H2s for better structure.");
        assert_eq!(messages[2], "Fewer internal links (2 vs avg 8).");
        assert_eq!(messages[3], "Add 1–2 external links to authority sources.");
        assert_eq!(messages[4], "Add alt text to all images (currently 25%).");
    }

    #[test]
    fn competitor_order_does_not_matter() {
        let mut target = strong_target();
        target.word_count = 123;
        target.internal_links = 1;
        let mut comps = vec![
            page("https://a.test", 900, 3),
            page("https://b.test", 40, 12),
            page("https://c.test", 310, 0),
        ];
        let forward = score(&target, &comps).unwrap();
        comps.reverse();
        let backward = score(&target, &comps).unwrap();
        comps.swap(0, 1);
        let shuffled = score(&target, &comps).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn meeting_the_average_word_count_earns_full_points() {
        let mut target = strong_target();
        target.word_count = 400;
        let report = score(&target, &competitors()).unwrap();
        assert_eq!(report.breakdown[0].points, 20.0);
        assert!(
            report
                .suggestions
                .iter()
                .all(|s| s.dimension != Dimension::WordCount)
        );
    }

    #[test]
    fn score_stays_in_range_across_inputs() {
        let comps = competitors();
        for words in [0, 1, 50, 399, 400, 10_000] {
            for density in [0.0, 0.49, 1.5, 2.51, 9.0, 250.0] {
                for links in [0, 7, 8, 100] {
                    let mut target = page("https://mine.test", words, links);
                    target.keyword_density = density;
                    let report = score(&target, &comps).unwrap();
                    assert!(report.score <= 100);
                    let max: f64 = Dimension::ORDER.iter().map(|d| d.max_points()).sum();
                    assert!(report.score as f64 <= max);
                }
            }
        }
    }

    #[test]
    fn zero_average_competitors_never_divide_by_zero() {
        let target = page("https://mine.test", 0, 0);
        let comps = vec![page("https://a.test", 0, 0)];
        let report = score(&target, &comps).unwrap();
        assert_eq!(report.breakdown[0].points, 20.0);
        assert_eq!(report.breakdown[3].points, 10.0);
    }
}
