//! media-dl server
//!
//! Loads configuration, starts the retention sweeper and the REST API, and
//! shuts down gracefully on SIGTERM/SIGINT.

use clap::Parser;
use media_dl::{Config, Error, MediaDownloader, run_with_shutdown};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "media-dl", version, about = "Media download job server driving yt-dlp")]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind the API server to (overrides the config file)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Directory produced files are written to (overrides the config file)
    #[arg(short, long)]
    download_dir: Option<PathBuf>,
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> media_dl::Result<Config> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("failed to read {}: {}", path.display(), e),
        key: None,
    })?;
    toml::from_str(&text).map_err(|e| Error::Config {
        message: format!("failed to parse {}: {}", path.display(), e),
        key: None,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(bind) = cli.bind {
        config.api.bind_address = bind;
    }
    if let Some(dir) = cli.download_dir {
        config.download.download_dir = dir;
    }

    let downloader = Arc::new(MediaDownloader::new(config).await?);
    downloader.start_retention_sweeper();

    let api_handle = downloader.spawn_api_server();

    tokio::select! {
        result = api_handle => {
            match result {
                Ok(Ok(())) => tracing::warn!("API server stopped unexpectedly"),
                Ok(Err(e)) => tracing::error!(error = %e, "API server failed"),
                Err(e) => tracing::error!(error = %e, "API server task panicked"),
            }
            downloader.shutdown().await?;
        }
        result = run_with_shutdown((*downloader).clone()) => {
            result?;
        }
    }

    Ok(())
}
