//! CLI entry point for index_stats.
//!
//! Reads cluster index metadata from a JSON file or the `_cat/indices` API,
//! then prints the largest, most-sharded and least balanced indexes.

use anyhow::Result;
use clap::Parser;
use index_stats::analyzer::analyze;
use index_stats::config::{Cli, Config, OutputFormat};
use index_stats::output::{append_report, write_json, write_report};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();
    let config = Config::from_cli(cli)?;
    let source = config.build_source()?;

    let report = analyze(source.as_ref(), config.top_n)
        .await
        .inspect_err(|e| error!(error = %e, "Failed to load index data"))?;

    let mut stdout = std::io::stdout().lock();
    match config.format {
        OutputFormat::Text => write_report(&mut stdout, &report)?,
        OutputFormat::Json => write_json(&mut stdout, &report)?,
    }

    if let Some(path) = &config.csv {
        append_report(path, &report)?;
        info!(path = %path.display(), "Rankings appended to CSV");
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
///
/// The returned guard flushes the file writer when dropped.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/index_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("index_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}
