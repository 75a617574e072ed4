//! Reproducibility index CLI
//!
//! Two entry points into the system:
//! - `index` walks an attestation corpus and writes the JSON document tree
//! - `serve` exposes badge and redirect endpoints over a written index

use clap::{Parser, Subcommand};
use rebuild_indexer::{IndexBuilder, IndexWriter};
use rebuild_server::{ServeConfig, Server};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI-level errors
#[derive(Debug, Error)]
enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Index(#[from] rebuild_indexer::IndexError),

    #[error(transparent)]
    Server(#[from] rebuild_server::ServerError),
}

/// Reproducibility index CLI
#[derive(Parser)]
#[command(name = "rebuild-index")]
#[command(about = "Reproducible build attestation index", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level
    #[arg(long, env = "REBUILD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "REBUILD_LOG_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Build the index document tree from an attestation corpus
    Index {
        /// Input directory holding rebuild attestations
        #[arg(short, long, env = "REBUILD_INPUT")]
        input: PathBuf,

        /// Output directory for the index document tree
        #[arg(short, long, env = "REBUILD_OUTPUT")]
        output: PathBuf,
    },

    /// Serve badge and redirect endpoints over a written index
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "REBUILD_CONFIG")]
        config: Option<String>,

        /// Listen address
        #[arg(short, long, env = "REBUILD_LISTEN_ADDR")]
        listen: Option<String>,

        /// Local index directory
        #[arg(long, env = "REBUILD_INDEX_DIR")]
        index_dir: Option<String>,

        /// Remote index base url
        #[arg(long, env = "REBUILD_INDEX_URL")]
        index_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    match cli.command {
        Commands::Index { input, output } => {
            tracing::info!(input = %input.display(), output = %output.display(), "generating index");

            let set = IndexBuilder::new().build(&input).await?;
            tracing::info!(
                dependencies = set.dependencies.len(),
                projects = set.projects.len(),
                "generated index"
            );

            IndexWriter::new(&output).write_all(&set).await?;
            tracing::info!(output = %output.display(), "index written");
            Ok(())
        }
        Commands::Serve {
            config,
            listen,
            index_dir,
            index_url,
        } => {
            let mut config = ServeConfig::load(config.as_deref())
                .map_err(|e| CliError::Config(e.to_string()))?;

            // Override with CLI args
            if let Some(listen) = listen {
                config.http.listen_addr = listen
                    .parse()
                    .map_err(|e| CliError::Config(format!("Invalid listen address: {}", e)))?;
            }
            if index_dir.is_some() {
                config.index.dir = index_dir;
            }
            if index_url.is_some() {
                config.index.url = index_url;
            }

            let server = Server::new(config)?;
            server.run().await?;
            Ok(())
        }
    }
}
