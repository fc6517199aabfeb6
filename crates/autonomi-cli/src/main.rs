//! Autonomi CLI - provision network-fabric elements from the terminal.
//!
//! This is the entry point for the `autonomi` binary.

mod commands;

use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use autonomi_sdk::Client;
use commands::Command;

/// Autonomi CLI - provision network-fabric elements from the terminal.
#[derive(Parser, Debug)]
#[command(name = "autonomi")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Personal access token.
    #[arg(long, env = "AUTONOMI_PAT", hide_env_values = true)]
    token: String,

    /// API host URL.
    #[arg(
        long,
        env = "AUTONOMI_HOST_URL",
        default_value = "https://api.autonomi-platform.com"
    )]
    host_url: String,

    /// Accept the Autonomi terms and conditions.
    #[arg(long, env = "AUTONOMI_TERMS_AND_CONDITIONS", default_value = "false")]
    accept_terms: bool,

    /// Seconds between two polls while waiting for a state.
    #[arg(long, env = "AUTONOMI_RETRY_INTERVAL", default_value = "30")]
    retry_interval: u64,

    /// Maximum number of polls while waiting for a state.
    #[arg(long, env = "AUTONOMI_MAX_RETRY", default_value = "60")]
    max_retry: u32,

    /// Enable debug logging.
    #[arg(long, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("autonomi_sdk=debug,autonomi_cli=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = Client::builder()
        .terms_accepted(args.accept_terms)
        .host_url(args.host_url)
        .personal_access_token(args.token)
        .retry_interval(Duration::from_secs(args.retry_interval))
        .max_retry(args.max_retry)
        .build()
        .await?;

    // The handler replaces SIGINT's default exit, so every command races the token.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling command");
            on_signal.cancel();
        }
    });

    let output =
        commands::interruptible(&cancel, commands::run(&client, args.command, &cancel)).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
