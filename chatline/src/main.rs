// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::sync::Arc;

use chatline::chat::{ChatSession, SessionSettings};
use chatline::config;
use chatline::repl::Repl;
use chatline::stream::{FileDiagnosticLog, StreamSession};
use chatline::transport::ReqwestTransport;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatline", about = "Streaming chat client for OpenAI-compatible APIs")]
struct Cli {
    /// Path to the chatline.yaml config file
    #[arg(long, default_value = "chatline.yaml", env = "CHATLINE_CONFIG")]
    config: PathBuf,

    /// Model for the first request, overriding the config
    #[arg(long)]
    model: Option<String>,

    /// Where undecodable frames are recorded, overriding the config
    #[arg(long, env = "ERROR_LOG_FILE")]
    error_log: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let source = config::source_for(&cli.config);
    let config = match config::load_config(source.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(path = %cli.config.display(), "failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let model = cli.model.unwrap_or_else(|| config.model.clone());
    let log_file = cli.error_log.unwrap_or_else(|| config.diagnostics.log_file.clone());

    tracing::info!(
        version = %config.version,
        base_url = %config.api.base_url,
        %model,
        log_file = %log_file.display(),
        timeout_ms = config.request.timeout_ms,
        "config loaded"
    );

    let client = match reqwest::Client::builder().build() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };
    let transport = Arc::new(ReqwestTransport::new(
        client,
        config.api.base_url.clone(),
        config.api.api_key.clone(),
    ));
    let diagnostics = Arc::new(FileDiagnosticLog::new(log_file));
    let stream = StreamSession::new(transport, diagnostics).with_timeout(config.request.timeout());

    let settings = SessionSettings::new(model)
        .with_system_message(config.system_message.clone())
        .with_include_usage(config.request.include_usage);
    let mut chat = ChatSession::new(stream, settings);

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut repl = Repl::new(input, std::io::stdout(), config.models.clone());
    if let Err(e) = repl.run(&mut chat).await {
        tracing::error!("terminal I/O failed: {e}");
        std::process::exit(1);
    }
}
