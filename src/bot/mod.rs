pub mod callbacks;
pub mod commands;
pub mod handlers;
pub mod payments;
pub mod render;

use std::error::Error;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::types::Recipient;

use crate::router::Router;

pub type HandlerError = Box<dyn Error + Send + Sync>;
pub type HandlerResult = Result<(), HandlerError>;

/// Shared application state, accessible from all handlers.
pub struct AppState {
    pub router: Router,
    /// Where `/post` and `/post_direct` go.
    pub channel: Recipient,
}

impl AppState {
    pub fn new(router: Router) -> Self {
        let channel = channel_recipient(&router.config.channel);
        Self { router, channel }
    }
}

/// `@handle` or a numeric chat id such as `-1001234567890`.
pub fn channel_recipient(channel: &str) -> Recipient {
    match channel.trim().parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(channel.trim().to_string()),
    }
}

/// Build the teloxide update handler tree.
pub fn build_handler() -> UpdateHandler<HandlerError> {
    let payment_handler = Update::filter_message()
        .filter(|msg: Message| msg.successful_payment().is_some())
        .endpoint(payments::handle_successful_payment);

    let command_handler = Update::filter_message()
        .filter_command::<commands::BotCommand>()
        .endpoint(commands::handle_command);

    let callback_handler = Update::filter_callback_query()
        .endpoint(callbacks::handle_callback);

    let pre_checkout_handler = Update::filter_pre_checkout_query()
        .endpoint(payments::handle_pre_checkout);

    let message_handler = Update::filter_message()
        .endpoint(handlers::handle_message);

    dptree::entry()
        .branch(payment_handler)
        .branch(command_handler)
        .branch(callback_handler)
        .branch(pre_checkout_handler)
        .branch(message_handler)
}
