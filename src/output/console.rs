use super::OutputHandler;
use crate::analyzer::Analysis;
use crate::error::Result;
use crate::features::PageOutcome;
use async_trait::async_trait;
use indicatif::MultiProgress;
use std::sync::Arc;

pub struct ConsoleOutput {
    multi: Option<Arc<MultiProgress>>,
}

impl ConsoleOutput {
    pub fn new(multi: Option<Arc<MultiProgress>>) -> Self {
        Self { multi }
    }

    /// Report lines always reach stdout, even when the bars' draw target is
    /// hidden because stderr is not a terminal.
    fn println(&self, line: &str) {
        match &self.multi {
            Some(multi) if !multi.is_hidden() => multi.suspend(|| println!("{}", line)),
            _ => println!("{}", line),
        }
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl OutputHandler for ConsoleOutput {
    async fn write(&mut self, analysis: &Analysis) -> Result<()> {
        for line in render(analysis) {
            self.println(&line);
        }
        Ok(())
    }
}

/// Score, suggestions and competitor list as display lines.
pub fn render(analysis: &Analysis) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("\n📈 SEO score for '{}'", analysis.keyword));
    lines.push(format!("   Score: {} / 100", analysis.report.score));
    for dim in &analysis.report.breakdown {
        lines.push(format!(
            "   {:<16} {:>5.1} / {}",
            dim.dimension.to_string(),
            dim.points,
            dim.max_points
        ));
    }

    lines.push("\n🛠️  Suggestions to improve".to_string());
    if analysis.report.suggestions.is_empty() {
        lines.push("   None, the page matches or beats the competition.".to_string());
    }
    for message in analysis.report.messages() {
        lines.push(format!("   📌 {}", message));
    }

    lines.push("\n🔗 Competitor URLs".to_string());
    for (i, competitor) in analysis.competitors.iter().enumerate() {
        match competitor {
            PageOutcome::Extracted(features) => lines.push(format!(
                "   {}. {} ({} words)",
                i + 1,
                features.url,
                features.word_count
            )),
            PageOutcome::Failed(failed) => lines.push(format!(
                "   {}. {} (not analyzed: {})",
                i + 1,
                failed.url,
                failed.error
            )),
        }
    }

    lines
}
