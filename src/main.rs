use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use seo_analyzer::analyzer::Analyzer;
use seo_analyzer::config::{AnalyzerConfig, ConfigLoader, OutputConfig};
use seo_analyzer::output::{OutputHandler, console::ConsoleOutput, json::JsonOutput};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "seo-analyzer")]
#[command(version = "0.1.0")]
#[command(about = "Compare a page's on-page SEO against the top results for a keyword", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a page against the top-ranking competitors for a keyword
    Analyze {
        /// Target keyword
        #[arg(short, long, default_value = "")]
        keyword: String,

        /// URL of the page to analyze
        #[arg(short, long, default_value = "")]
        url: String,

        /// Path to a configuration file (JSON/YAML/TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Hide the spinner and log through plain stderr
        #[arg(short, long)]
        quiet: bool,
    },
    /// Validate a configuration file
    Check {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    let cli = Cli::parse();
    let logger = env_logger::Builder::from_default_env().build();
    let multi = Arc::new(MultiProgress::new());

    match cli.command {
        Commands::Analyze {
            keyword,
            url,
            config,
            quiet,
        } => {
            let progress = !quiet;
            if keyword.trim().is_empty() || url.trim().is_empty() {
                eprintln!("⚠️  Please enter both a keyword and your content URL.");
                std::process::exit(2);
            }

            let max_level = logger.filter();
            if progress {
                indicatif_log_bridge::LogWrapper::new((*multi).clone(), logger).try_init()?;
            } else {
                log::set_boxed_logger(Box::new(logger))?;
            }
            log::set_max_level(max_level);

            let config = match ConfigLoader::load_or_default(config.as_deref()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Config error: {}", e);
                    std::process::exit(1);
                }
            };

            if let Err(e) = run_analysis(&config, &keyword, &url, progress, multi).await {
                eprintln!("❌ Something went wrong: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Check { config } => match ConfigLoader::load(&config) {
            Ok(cfg) => {
                println!("✅ Config is valid:");
                println!("   Search URL: {}", cfg.search_url);
                println!("   Result selector: {}", cfg.result_container);
                println!("   Results: {}", cfg.results);
                println!("   Static competitors: {}", cfg.competitor_urls.len());
                println!("   Timeout: {}s", cfg.timeout_secs);
            }
            Err(e) => {
                eprintln!("❌ Config error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

async fn run_analysis(
    config: &AnalyzerConfig,
    keyword: &str,
    url: &str,
    progress: bool,
    multi: Arc<MultiProgress>,
) -> anyhow::Result<()> {
    let analyzer = Analyzer::from_config(config)?;

    let spinner = if progress {
        let pb = multi.add(ProgressBar::new_spinner());
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
        pb.set_message("Fetching top competitors and analyzing SEO...");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let result = analyzer.analyze(keyword, url).await;
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let analysis = result?;

    let mut handler: Box<dyn OutputHandler> = match &config.output {
        Some(OutputConfig::Json { path }) => Box::new(JsonOutput::new(PathBuf::from(path))?),
        Some(OutputConfig::Console) | None => {
            Box::new(ConsoleOutput::new(progress.then(|| multi.clone())))
        }
    };
    handler.write(&analysis).await?;
    handler.close().await?;

    let metrics = analyzer.get_metrics();
    println!("\n✅ Analysis Completed:");
    println!("   Pages Fetched: {}/{}", metrics.pages_fetched, metrics.pages_requested);
    println!("   Success Rate: {:.1}%", metrics.success_rate);
    println!("   Average Duration: {}ms", metrics.avg_response_time_ms);
    println!("   Total Time: {:.1}s", metrics.elapsed_seconds);
    if let Some(OutputConfig::Json { path }) = &config.output {
        println!("   Report: {}", path);
    }

    Ok(())
}
