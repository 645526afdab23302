use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use logrot::{FolderWatcher, WatchConfig};

#[derive(Parser)]
#[command(name = "logrot")]
#[command(about = "Bounded rolling log file keeper for a watched directory", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory to watch and manage
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Optional TOML config file (CLI flags override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rotate once the newest file reaches this many bytes
    #[arg(long)]
    size_threshold: Option<u64>,

    /// Evict the oldest file once more than this many files exist
    #[arg(long)]
    max_files: Option<usize>,

    /// Seconds between polling passes
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Extension given to newly created files
    #[arg(long)]
    extension: Option<String>,

    /// Optional log file path for debug logging
    #[arg(short, long)]
    log: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_ref())?;

    let mut config = match &cli.config {
        Some(path) => WatchConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => WatchConfig::default(),
    };
    if let Some(dir) = cli.dir {
        config.watch_dir = dir;
    }
    if let Some(bytes) = cli.size_threshold {
        config.size_threshold_bytes = bytes;
    }
    if let Some(count) = cli.max_files {
        config.max_file_count = count;
    }
    if let Some(secs) = cli.poll_interval {
        config.poll_interval_secs = secs;
    }
    if let Some(extension) = cli.extension {
        config.file_extension = extension;
    }
    config.validate()?;

    let mut watcher = FolderWatcher::new(config)?;
    watcher.start()?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutting down");
    watcher.stop().await;
    Ok(())
}

/// Initialize logging with the local `YYYY-MM-DD HH:MM:SS` timestamp format
/// and optional file output
fn init_logging(log_path: Option<&PathBuf>) -> Result<()> {
    use tracing_subscriber::fmt::time::ChronoLocal;
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    let timer = ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_file) = log_path {
        // With log file: everything to the file, info+ still on stdout
        let file_appender = tracing_appender::rolling::never(
            log_file
                .parent()
                .unwrap_or_else(|| std::path::Path::new(".")),
            log_file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("logrot.log"),
        );

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(timer)
            .with_target(false)
            .with_ansi(false)
            .with_writer(file_appender.and(std::io::stdout.with_max_level(tracing::Level::INFO)))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(timer)
            .with_target(false)
            .with_writer(std::io::stdout)
            .init();
    }

    Ok(())
}
