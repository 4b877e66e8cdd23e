use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, Recipient,
    ReplyMarkup,
};
use url::Url;

use crate::bot::AppState;
use crate::catalog::{DocKey, ABOUT_LABEL};
use crate::router::{Markup, Outgoing, Target, BUY_CALLBACK};

/// Reply keyboard layout: two documents per row, "about" last.
const MAIN_MENU: [&[DocKey]; 3] = [
    &[DocKey::Venues, DocKey::HiddenCosts],
    &[DocKey::VsDiy, DocKey::BudgetCalc],
    &[DocKey::Checklist, DocKey::VenueQuestions],
];

pub fn main_menu() -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = MAIN_MENU
        .iter()
        .map(|row| row.iter().map(|key| KeyboardButton::new(key.menu_label())).collect())
        .collect();
    rows.push(vec![KeyboardButton::new(ABOUT_LABEL)]);
    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Convert a router markup into a Telegram keyboard. URL buttons whose
/// link doesn't parse are dropped.
pub fn reply_markup(markup: &Markup) -> Option<ReplyMarkup> {
    match markup {
        Markup::None => None,
        Markup::MainMenu => Some(ReplyMarkup::Keyboard(main_menu())),
        Markup::Links(buttons) => {
            let rows: Vec<Vec<InlineKeyboardButton>> = buttons
                .iter()
                .filter_map(|button| match Url::parse(&button.url) {
                    Ok(url) => Some(vec![InlineKeyboardButton::url(button.text.clone(), url)]),
                    Err(e) => {
                        tracing::warn!(
                            "Skipping button {:?}: bad URL {:?}: {}",
                            button.text,
                            button.url,
                            e
                        );
                        None
                    }
                })
                .collect();
            if rows.is_empty() {
                None
            } else {
                Some(ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows)))
            }
        }
        Markup::Buy { label } => Some(ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(
            vec![vec![InlineKeyboardButton::callback(label.clone(), BUY_CALLBACK)]],
        ))),
    }
}

/// Send router output in order. Stops at the first failed send.
pub async fn deliver(
    bot: &Bot,
    state: &AppState,
    chat_id: ChatId,
    messages: Vec<Outgoing>,
) -> anyhow::Result<()> {
    for message in messages {
        let recipient = match message.target {
            Target::Chat => Recipient::Id(chat_id),
            Target::Channel => state.channel.clone(),
        };
        let markup = reply_markup(&message.markup);

        let request = bot.send_message(recipient, message.text);
        match markup {
            Some(markup) => request.reply_markup(markup).await?,
            None => request.await?,
        };

        if message.target == Target::Channel {
            tracing::info!("Posted to channel {:?} on behalf of chat {}", state.channel, chat_id.0);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::LinkButton;

    fn inline_rows(markup: Option<ReplyMarkup>) -> Vec<Vec<InlineKeyboardButton>> {
        match markup {
            Some(ReplyMarkup::InlineKeyboard(kb)) => kb.inline_keyboard,
            other => panic!("expected inline keyboard, got {other:?}"),
        }
    }

    #[test]
    fn main_menu_has_every_label() {
        let labels: Vec<String> = main_menu()
            .keyboard
            .into_iter()
            .flatten()
            .map(|button| button.text)
            .collect();
        assert_eq!(labels.len(), DocKey::ALL.len() + 1);
        for key in DocKey::ALL {
            assert!(labels.iter().any(|l| l == key.menu_label()));
        }
        assert_eq!(labels.last().map(String::as_str), Some(ABOUT_LABEL));
    }

    #[test]
    fn bad_urls_are_dropped() {
        let markup = Markup::Links(vec![
            LinkButton {
                text: "ok".to_string(),
                url: "https://ex.com/v".to_string(),
            },
            LinkButton {
                text: "broken".to_string(),
                url: "not a url".to_string(),
            },
        ]);
        let rows = inline_rows(reply_markup(&markup));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].text, "ok");

        let only_broken = Markup::Links(vec![LinkButton {
            text: "broken".to_string(),
            url: "::".to_string(),
        }]);
        assert!(reply_markup(&only_broken).is_none());
    }

    #[test]
    fn buy_button_carries_callback() {
        let rows = inline_rows(reply_markup(&Markup::Buy {
            label: "buy".to_string(),
        }));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0].text, "buy");
    }

    #[test]
    fn no_markup() {
        assert!(reply_markup(&Markup::None).is_none());
    }
}
