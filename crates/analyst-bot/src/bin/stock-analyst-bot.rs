//! Stock Analyst Telegram bot
//!
//! # Usage
//!
//! ```bash
//! # Credentials (or put them in a .env file)
//! export TELEGRAM_BOT_TOKEN="123456:ABC..."
//! export TWELVE_DATA_API_KEY="..."
//! export OPENROUTER_API_KEY="sk-or-..."
//!
//! # Run the bot
//! cargo run --bin stock-analyst-bot -p analyst-bot -- --json-logs
//! ```

use analyst_bot::{AnalysisPipeline, AnalystConfig, TelegramBot, TelegramClient};
use analyst_utils::{Environment, LogFormat, init_tracing};
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "stock-analyst-bot")]
#[command(about = "Telegram bot that analyses stock tickers", long_about = None)]
struct Args {
    /// Emit JSON logs (default in production)
    #[arg(long)]
    json_logs: bool,

    /// OpenRouter model identifier
    #[arg(long, env = "OPENROUTER_MODEL")]
    model: Option<String>,

    /// Timeout for each outbound call, in seconds
    #[arg(long, env = "ANALYST_REQUEST_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::for_environment(Environment::from_env())
    };
    init_tracing(format, "info");

    match dotenv {
        Err(e) if !e.not_found() => warn!(error = %e, "failed to load .env file"),
        _ => {}
    }

    let mut config = AnalystConfig::from_env().context("failed to load configuration")?;
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(secs) = args.timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }
    config.validate()?;

    info!(model = %config.model, timeout = ?config.request_timeout, "starting stock analyst bot");

    let client = Arc::new(TelegramClient::new(
        &config.telegram_base_url,
        &config.telegram_token,
        config.request_timeout,
    )?);
    let me = client.get_me().await.context("failed to reach Telegram")?;
    info!(bot = me.username.as_deref().unwrap_or(&me.first_name), "connected to Telegram");

    let pipeline = AnalysisPipeline::from_config(&config, client.clone())?;
    TelegramBot::new(client, pipeline).run().await?;

    info!("bot stopped");
    Ok(())
}
