mod crawl;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::crawl::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "fcdb")]
#[command(about = "Furniture catalog crawler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Walk every category and write the catalog file.
    Crawl(CrawlArgs),
    /// Print the fixed category table.
    Categories,
}

#[derive(Debug, Args)]
struct CrawlArgs {
    /// Catalog serialization format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,
    /// Destination file, overriding FCDB_OUTPUT_PATH.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = fcdb_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Crawl(args) => crawl::run_crawl(&config, args.format, args.output).await,
        Commands::Categories => {
            for category in &fcdb_core::CATEGORIES {
                println!("{:<16} {}", category.name, category.url);
            }
            Ok(())
        }
    }
}
