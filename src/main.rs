//! CLI entry point for folio-rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "Markdown content pipeline for a portfolio and blog site", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// File name for the new post (without extension)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// List site content
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, slug, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a single rendered post
    Show {
        /// Slug of the post
        slug: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List posts carrying a tag
    Tag {
        /// Tag to filter by (case-sensitive)
        tag: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the stylesheet that switches code blocks to the dark theme
    Css,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::New { title, path } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            folio_rs::commands::new::run(&folio, &title, path.as_deref())?;
        }

        Commands::List { r#type, json } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::debug!("Reading posts from {:?}", folio.content_dir);
            folio_rs::commands::list::run(&folio, &r#type, json).await?;
        }

        Commands::Show { slug, json } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::show::run(&folio, &slug, json)?;
        }

        Commands::Tag { tag, json } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::list::run_tag(&folio, &tag, json).await?;
        }

        Commands::Css => {
            print!("{}", folio_rs::content::DARK_MODE_CSS);
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
