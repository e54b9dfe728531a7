pub mod analyzer;
pub mod config;
pub mod discovery;
pub mod document;
pub mod error;
pub mod features;
pub mod fetcher;
pub mod metrics;
pub mod output;
pub mod scorer;
pub mod selector;

pub use analyzer::{Analysis, Analyzer};
pub use discovery::{Discoverer, SearchDiscoverer, StaticDiscoverer};
pub use error::{Error, Result};
pub use features::{FeatureExtractor, PageFeatures, PageOutcome};
pub use metrics::collector::MetricsCollector;
pub use metrics::snapshot::MetricsSnapshot;
pub use scorer::{Dimension, ScoreReport};
