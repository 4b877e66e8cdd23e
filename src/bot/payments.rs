use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{LabeledPrice, PreCheckoutQuery};

use crate::bot::render::deliver;
use crate::bot::{AppState, HandlerResult};
use crate::router::Invoice;

/// Send the single-item "unlock all" invoice.
pub async fn send_invoice(bot: &Bot, chat_id: ChatId, invoice: Invoice) -> anyhow::Result<()> {
    tracing::info!(
        "Sending invoice to chat {}: {} {} (minor units)",
        chat_id.0,
        invoice.amount,
        invoice.currency
    );

    bot.send_invoice(
        chat_id,
        invoice.title,
        invoice.description,
        invoice.payload,
        invoice.currency,
        vec![LabeledPrice::new(invoice.label, invoice.amount)],
    )
    .provider_token(invoice.provider_token)
    .await?;

    Ok(())
}

/// Every pre-checkout query is approved.
pub async fn handle_pre_checkout(bot: Bot, query: PreCheckoutQuery) -> HandlerResult {
    tracing::info!(
        "Pre-checkout from user {}: payload={}, {} {}",
        query.from.id.0,
        query.invoice_payload,
        query.total_amount,
        query.currency
    );
    bot.answer_pre_checkout_query(query.id.clone(), true).await?;
    Ok(())
}

pub async fn handle_successful_payment(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
) -> HandlerResult {
    let Some(payment) = msg.successful_payment() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    tracing::info!(
        "Payment received in chat {}: {} {}",
        chat_id.0,
        payment.total_amount,
        payment.currency
    );

    let replies = state
        .router
        .payment_succeeded(chat_id.0, &payment.invoice_payload)
        .await;
    deliver(&bot, &state, chat_id, replies).await?;
    Ok(())
}
