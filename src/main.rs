// Copyright (C) 2025 Category Labs, Inc.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Rugcheck Bot - replies to token addresses with a rugcheck.xyz risk summary.

use rugcheck_bot::config::Config;
use rugcheck_bot::fetch::Fetcher;
use rugcheck_bot::pipeline::Pipeline;
use rugcheck_bot::telegram;

use std::sync::Arc;
use teloxide::Bot;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Rugcheck Bot starting...");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load config: {}", e);
        e
    })?;

    info!("📡 Source: {}", config.base_url);
    info!(
        "🧭 Fetch mode: {:?} ({}s timeout)",
        config.fetch_mode,
        config.fetch_timeout.as_secs()
    );
    info!(
        "🔑 Addresses: {}-{} chars, EVM {}, invalid input -> {:?}",
        config.address_rules.min_len,
        config.address_rules.max_len,
        if config.address_rules.allow_evm { "on" } else { "off" },
        config.invalid_input
    );

    let fetcher = Fetcher::from_config(&config).map_err(|e| {
        error!("Failed to build fetcher: {}", e);
        e
    })?;
    let pipeline = Arc::new(Pipeline::new(fetcher, &config));

    telegram::run(Bot::new(&config.bot_token), pipeline).await;

    info!("👋 Rugcheck Bot stopped");
    Ok(())
}
