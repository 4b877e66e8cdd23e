use std::sync::Arc;

use anyhow::Context;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing_subscriber::EnvFilter;

mod access;
mod bot;
mod catalog;
mod config;
mod router;
mod store;

use access::RestrictedChats;
use config::AppConfig;
use router::Router;
use store::{AssetStore, UnlockStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("💍 Starting wedding docs bot...");

    let config = AppConfig::from_env()?;
    tracing::info!(
        "Config loaded. Channel: {}, payments: {}, price: {} {}",
        config.channel,
        if config.payments_enabled() { "on" } else { "manual" },
        config.price,
        config.currency
    );

    let assets = AssetStore::load(&config.assets_file).await;
    let unlocks = UnlockStore::load(&config.unlocked_file).await;

    let bot = Bot::new(&config.bot_token);

    let bot_username = match config.bot_username.clone() {
        Some(username) => username,
        None => {
            let me = bot.get_me().await.context("getMe failed")?;
            me.user
                .username
                .clone()
                .context("bot account has no username")?
        }
    };
    tracing::info!("Deep links will point at @{}", bot_username);

    if let Err(e) = bot.set_my_commands(bot::commands::BotCommand::bot_commands()).await {
        tracing::warn!("Failed to register command list: {}", e);
    }

    let router = Router::new(config, bot_username, assets, unlocks, RestrictedChats::new());
    let state = Arc::new(bot::AppState::new(router));

    // Build the dispatcher
    let handler = bot::build_handler();

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
