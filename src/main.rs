//! CLI entry point for nota

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nota")]
#[command(version)]
#[command(about = "A lightweight MDX blog engine with content collections, RSS and sitemap", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
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
    /// Start the server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Disable file watching and live reload
        #[arg(long)]
        r#static: bool,
    },

    /// Validate all content without serving
    Check,

    /// List posts
    List,

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Create it published instead of as a draft
        #[arg(long)]
        publish: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "nota=debug,info"
    } else {
        "nota=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let site = nota::Site::new(&base_dir)?;

    match cli.command {
        Commands::Serve {
            port,
            ip,
            open,
            r#static,
        } => {
            tracing::info!("starting server at http://{}:{}", ip, port);
            nota::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::Check => {
            nota::commands::check::run(&site)?;
        }

        Commands::List => {
            nota::commands::list::run(&site)?;
        }

        Commands::New { title, publish } => {
            nota::commands::new::run(&site, &title, publish)?;
        }
    }

    Ok(())
}
