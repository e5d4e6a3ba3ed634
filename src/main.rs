use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use trend_report::{render_section, write_csv_file, TrendDocument};
use trendscope_core::{
    AppConfig, BoardConfig, ConfigError, CoreError, ErrorExt, ErrorReporter, ExtractionConfig,
    PostRecord, SiteKind,
};

mod pipeline;

use pipeline::{analyze_posts, TrendAnalyzer};

const DEFAULT_LOG_FILTER: &str = "trendscope=info,community_client=info,keyword_engine=info";

#[derive(Parser)]
#[command(name = "trendscope")]
#[command(about = "Trending keywords from Korean community boards")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the configured boards and save their keyword rankings
    Crawl {
        /// TOML file listing the boards to visit
        #[arg(short, long, env = "TRENDSCOPE_CONFIG", default_value = "trendscope.toml")]
        config: PathBuf,
    },

    /// Rank keywords of posts saved as a JSON array
    Analyze {
        /// JSON array of post records
        #[arg(long)]
        posts: PathBuf,

        /// Site whose tokenizer and stopwords apply
        #[arg(long)]
        site: SiteKind,

        /// Name shown in the reports
        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value_t = 100)]
        top_n: usize,

        /// Overrides the site's minimum keyword length
        #[arg(long)]
        min_length: Option<usize>,

        #[arg(long)]
        json: Option<PathBuf>,

        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Rank keywords across saved report documents
    Merge {
        #[arg(required = true)]
        reports: Vec<PathBuf>,

        #[arg(long, default_value_t = 20)]
        top_n: usize,

        /// Where to save the combined document
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Crawl { config } => crawl(&config).await,
        Commands::Analyze {
            posts,
            site,
            name,
            top_n,
            min_length,
            json,
            csv,
        } => {
            let extraction = ExtractionConfig {
                top_n,
                min_length,
                ..ExtractionConfig::default()
            };
            analyze(&posts, site, name, &extraction, json.as_deref(), csv.as_deref())
        }
        Commands::Merge {
            reports,
            top_n,
            output,
        } => merge(&reports, top_n, output.as_deref()),
    };

    if let Err(error) = &result {
        tracing::error!("{:#}", error);
        if let Some(core) = error.downcast_ref::<CoreError>() {
            ErrorReporter::default().report_error(core);
        } else if let Some(config) = error.downcast_ref::<ConfigError>() {
            eprintln!("{}", config.user_friendly_message());
        }
    }
    result
}

async fn crawl(config_path: &Path) -> Result<()> {
    let config = AppConfig::load(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    tracing::info!("Starting crawl of {} boards", config.boards.len());

    let analyzer = TrendAnalyzer::over_http(config).context("Failed to build HTTP client")?;
    let document = analyzer.run().await.context("Crawl failed")?;

    if document.is_empty() {
        println!("no data: every board came back empty, nothing was written");
        return Ok(());
    }

    let output = &analyzer.config().output;
    save(&document, Some(output.json_path.as_path()), Some(output.csv_path.as_path()))?;

    let overall = document.overall(analyzer.config().extraction.overall_top_n);
    print!(
        "\n{}",
        render_section("overall", &overall, analyzer.config().extraction.overall_top_n)
    );
    Ok(())
}

fn analyze(
    posts_path: &Path,
    site: SiteKind,
    name: Option<String>,
    extraction: &ExtractionConfig,
    json: Option<&Path>,
    csv: Option<&Path>,
) -> Result<()> {
    let text = std::fs::read_to_string(posts_path)
        .with_context(|| format!("Failed to read {}", posts_path.display()))?;
    let posts: Vec<PostRecord> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of posts", posts_path.display()))?;

    let mut board = BoardConfig::new(site, "");
    board.name = name;

    let report = analyze_posts(&board, &posts, extraction)?;
    print!("{}", render_section(&report.source_name, &report.keywords, extraction.display_top));

    let source_id = format!("{}/{}", site, report.source_name);
    let mut document = TrendDocument::new();
    document.insert(source_id, report);
    save(&document, json, csv)
}

fn merge(report_paths: &[PathBuf], top_n: usize, output: Option<&Path>) -> Result<()> {
    let mut document = TrendDocument::new();
    for path in report_paths {
        let loaded = TrendDocument::read_json(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        let label = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        document.extend_from(loaded, &label);
    }

    if document.is_empty() {
        bail!("No sources found in {} report files", report_paths.len());
    }

    let overall = document.overall(top_n);
    print!("{}", render_section("overall", &overall, top_n));

    save(&document, output, None)
}

fn save(document: &TrendDocument, json: Option<&Path>, csv: Option<&Path>) -> Result<()> {
    if let Some(path) = json {
        document
            .write_json(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }
    if let Some(path) = csv {
        write_csv_file(document, path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }
    Ok(())
}
