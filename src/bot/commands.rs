use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::render::deliver;
use crate::bot::{AppState, HandlerResult};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum BotCommand {
    #[command(description = "главное меню")]
    Start(String),
    #[command(description = "все материалы списком")]
    Docs,
    #[command(description = "эта справка")]
    Help,
    #[command(description = "(админ) задать ссылку: /seturl <ключ> <URL>")]
    SetUrl(String),
    #[command(description = "(админ) пост в канал со ссылками на бота")]
    Post,
    #[command(rename = "post_direct", description = "(админ) пост в канал с прямыми ссылками")]
    PostDirect,
}

impl BotCommand {
    fn is_admin_only(&self) -> bool {
        matches!(self, Self::SetUrl(_) | Self::Post | Self::PostDirect)
    }
}

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: BotCommand,
    state: Arc<AppState>,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0);
    let router = &state.router;

    if cmd.is_admin_only() && !router.config.is_admin(user_id) {
        tracing::warn!("User {} tried admin command {:?}", user_id, cmd);
        deliver(&bot, &state, chat_id, router.admin_only()).await?;
        return Ok(());
    }

    let replies = match cmd {
        BotCommand::Start(payload) => {
            tracing::info!("/start from chat {} with payload {:?}", chat_id.0, payload);
            router.start(chat_id.0, &payload).await
        }
        BotCommand::Docs => router.docs(chat_id.0).await,
        BotCommand::Help => {
            bot.send_message(chat_id, BotCommand::descriptions().to_string())
                .await?;
            return Ok(());
        }
        BotCommand::SetUrl(args) => {
            tracing::info!("/seturl from user {}: {}", user_id, args);
            router.set_url(&args).await
        }
        BotCommand::Post => {
            tracing::info!("/post from user {}", user_id);
            router.post()
        }
        BotCommand::PostDirect => {
            tracing::info!("/post_direct from user {}", user_id);
            router.post_direct().await
        }
    };

    deliver(&bot, &state, chat_id, replies).await?;
    Ok(())
}
