mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sitelens-cli")]
#[command(about = "Compare websites' conversion signals and page performance")]
struct Cli {
    /// Print compact single-line JSON instead of pretty-printed output
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract headline, pricing, discount and free-trial signals for each URL
    Analyze {
        /// Absolute http(s) URLs to analyze
        #[arg(required = true, num_args = 1..)]
        urls: Vec<String>,
        /// URL to compare the others against (defaults to the first URL)
        #[arg(long)]
        subject: Option<String>,
    },
    /// Compare page performance of two sites
    Compare {
        /// Your site
        your_url: String,
        /// The competitor's site
        competitor_url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = sitelens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let analyzer = sitelens_analyzer::Analyzer::from_config(&config)?;

    let output = match cli.command {
        Commands::Analyze { urls, subject } => {
            let report = commands::run_analyze(
                &analyzer,
                &urls,
                subject.as_deref(),
                config.max_urls_per_request,
            )
            .await?;
            commands::render(&report, cli.compact)?
        }
        Commands::Compare {
            your_url,
            competitor_url,
        } => {
            let comparison = commands::run_compare(&analyzer, &your_url, &competitor_url).await?;
            commands::render(&comparison, cli.compact)?
        }
    };

    println!("{output}");
    Ok(())
}
