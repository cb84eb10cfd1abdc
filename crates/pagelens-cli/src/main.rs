mod analyze;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pagelens")]
#[command(about = "Single-page SEO and AI-search analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze one or more URLs and print a JSON report for each
    Analyze {
        #[arg(required = true)]
        urls: Vec<String>,
        /// Maximum number of analyses in flight
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
        /// Print one report per line instead of pretty JSON
        #[arg(long)]
        compact: bool,
    },
    /// Fetch a URL and print the extracted page structure
    Page {
        url: String,
        /// Include the raw HTML in the output
        #[arg(long)]
        raw: bool,
        #[arg(long)]
        compact: bool,
    },
    /// Analyze a local HTML file without network access
    File {
        path: PathBuf,
        /// URL to report the file under
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = pagelens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            urls,
            concurrency,
            compact,
        } => analyze::run_analyze(&config, urls, concurrency, compact).await?,
        Commands::Page { url, raw, compact } => {
            analyze::run_page(&config, &url, raw, compact).await?;
        }
        Commands::File { path, url, compact } => {
            analyze::run_file(&config, &path, url.as_deref(), compact).await?;
        }
    }

    Ok(())
}
