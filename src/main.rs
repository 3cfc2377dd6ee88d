use anyhow::{Context, Result};
use clap::Parser;
use link_shortener::config::Config;
use link_shortener::infrastructure::persistence::StoreBackend;
use link_shortener::server;
use std::fs::OpenOptions;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// URL shortener HTTP service.
#[derive(Parser)]
#[command(name = "link-shortener")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage backend; overrides STORE_BACKEND
    #[arg(short, long, value_enum)]
    backend: Option<StoreBackend>,

    /// Bind address; overrides LISTEN
    #[arg(short, long)]
    listen: Option<String>,
}

/// Installs the global subscriber: stdout in the configured format, plus a
/// JSON file sink when `LOG_FILE` is set.
///
/// The returned guard flushes the file sink on drop; keep it alive until exit.
fn init_tracing(config: &Config) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = if config.log_format == "json" {
        fmt::layer().json().with_current_span(true).boxed()
    } else {
        fmt::layer().boxed()
    };

    let (file_layer, guard) = match config.log_file.as_deref() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {path}"))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env_with_backend(cli.backend)?;
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }
    config.validate()?;

    let _log_guard = init_tracing(&config)?;
    config.print_summary();

    server::run(config).await
}
