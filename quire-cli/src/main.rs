//! # quire CLI
//!
//! Command-line interface for the quire static site generator.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ListingOptions, OutputArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "quire.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one page from source files, earlier files winning on shared keys
    Page {
        /// Source files to combine
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Publish under this URL instead of the first file's URL
        #[arg(long)]
        url: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Render a listing page from many items
    Listing {
        /// URL of the listing page
        #[arg(long)]
        url: String,

        /// Templates each item is rendered through, in order
        #[arg(short = 'i', long = "item-template")]
        item_templates: Vec<PathBuf>,

        /// Include every markdown file under this directory as an item
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Extra literal fields (KEY=VALUE)
        #[arg(long = "field", value_parser = commands::parse_field)]
        fields: Vec<(String, String)>,

        /// Item source files, listed before any found under --dir
        paths: Vec<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for rendered output
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Page { paths, url, output } => {
            commands::render_page(&cli.config, &paths, url.as_deref(), &output).await
        }
        Commands::Listing {
            url,
            item_templates,
            dir,
            fields,
            paths,
            output,
        } => {
            let opts = ListingOptions {
                url,
                item_templates,
                dir,
                fields,
                paths,
            };
            commands::render_listing(&cli.config, opts, &output).await
        }
    }
}
