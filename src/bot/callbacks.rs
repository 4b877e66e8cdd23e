use std::sync::Arc;
use teloxide::prelude::*;

use crate::bot::render::deliver;
use crate::bot::{payments, AppState, HandlerResult};
use crate::router::{Purchase, BUY_CALLBACK};

pub async fn handle_callback(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> HandlerResult {
    let data = match q.data.as_deref() {
        Some(d) => d,
        None => return Ok(()),
    };

    // Stop the button spinner whatever happens next.
    bot.answer_callback_query(q.id.clone()).await?;

    if data != BUY_CALLBACK {
        tracing::debug!("Ignoring callback {:?} from user {}", data, q.from.id.0);
        return Ok(());
    }

    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
        return Ok(());
    };

    match state.router.purchase() {
        Purchase::Invoice(invoice) => payments::send_invoice(&bot, chat_id, invoice).await?,
        Purchase::Manual(reply) => {
            tracing::info!("Payments disabled, chat {} sent to manual fulfillment", chat_id.0);
            deliver(&bot, &state, chat_id, vec![reply]).await?;
        }
    }

    Ok(())
}
