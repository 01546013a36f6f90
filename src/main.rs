use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io;
use std::path::PathBuf;

mod cli;
mod config;
mod dispatch;
mod embed;
mod error;
mod event;
mod handler;
mod status;
mod template;

use cli::Cli;
use config::{ConfigLayer, HANDLER_NAME, HandlerConfig, LogLevel};
use dispatch::UreqTransport;
use handler::Handler;

fn open_log_file() -> Result<(fs::File, PathBuf)> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HANDLER_NAME)
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("handler.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .context("Failed to open log file")?;

    Ok((file, log_file))
}

fn setup_logging(log_level: &LogLevel) {
    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.as_filter());
    }

    // A read-only home must not stop the notification from going out
    let destination = match open_log_file() {
        Ok((file, path)) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            path.display().to_string()
        }
        Err(e) => {
            builder.target(env_logger::Target::Stderr);
            format!("stderr ({:#})", e)
        }
    };

    builder.init();

    info!("Logging initialized, writing to: {}", destination);
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration (before logging, so the file layer can pick the level)
    let file_layer = ConfigLayer::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let config = HandlerConfig::from_layers(&[cli.layer(), file_layer]);

    setup_logging(&config.log_level);
    info!("Starting {} with config: {:?}", HANDLER_NAME, config);

    let event = event::read_event(io::stdin().lock()).context("Failed to read event")?;
    let config = config.with_annotations(&event).context("Invalid annotation override")?;

    let transport = UreqTransport::new();
    Handler::new(config, &transport)
        .handle(&event)
        .context(format!("Error executing {}", HANDLER_NAME))?;

    Ok(())
}
