use std::sync::Arc;
use teloxide::prelude::*;

use crate::bot::render::deliver;
use crate::bot::{AppState, HandlerResult};

/// Menu buttons and any other plain text.
pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    let replies = state.router.menu_text(chat_id.0, text).await;

    deliver(&bot, &state, chat_id, replies).await?;
    Ok(())
}
