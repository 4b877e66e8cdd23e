use crate::access::{self, Decision, RestrictedChats, Tier};
use crate::catalog::{DeepLink, DocKey, ABOUT_LABEL};
use crate::config::AppConfig;
use crate::store::{AssetStore, UnlockStore};

/// Invoice payload tag of the "unlock all materials" product.
pub const UNLOCK_PAYLOAD: &str = "unlock_all";
/// Callback data of the paywall button.
pub const BUY_CALLBACK: &str = "buy_all";

const NOT_CONFIGURED: &str = "Ссылка ещё не настроена. Сообщите администратору.";

/// Keyboard attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    None,
    /// The persistent reply keyboard with one button per document plus "about".
    MainMenu,
    /// Inline URL buttons, one per row.
    Links(Vec<LinkButton>),
    /// Inline "buy" button that triggers the payment flow.
    Buy { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The chat the event came from.
    Chat,
    /// The configured promo channel.
    Channel,
}

/// A message the bot layer should send, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub target: Target,
    pub text: String,
    pub markup: Markup,
}

impl Outgoing {
    fn reply(text: impl Into<String>) -> Self {
        Self {
            target: Target::Chat,
            text: text.into(),
            markup: Markup::None,
        }
    }

    fn with(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }

    fn into_channel(mut self) -> Self {
        self.target = Target::Channel;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub title: String,
    pub description: String,
    pub payload: String,
    pub provider_token: String,
    pub currency: String,
    pub label: String,
    /// Smallest currency unit.
    pub amount: u32,
}

/// What pressing the buy button leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Purchase {
    Invoice(Invoice),
    Manual(Outgoing),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SetUrlError {
    #[error("Формат: /seturl <ключ> <URL>\nКлючи: {keys}", keys = key_list())]
    Usage,
    #[error("Неизвестный ключ «{0}». Допустимые ключи: {keys}", keys = key_list())]
    UnknownKey(String),
}

fn key_list() -> String {
    DocKey::ALL.map(|k| k.as_str()).join(", ")
}

/// Parse `/seturl` arguments: exactly a key and a URL.
pub fn parse_set_url(args: &str) -> Result<(DocKey, String), SetUrlError> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [key, url] = parts.as_slice() else {
        return Err(SetUrlError::Usage);
    };
    let key = key
        .parse::<DocKey>()
        .map_err(|_| SetUrlError::UnknownKey(key.to_string()))?;
    Ok((key, url.to_string()))
}

/// Turns inbound events into outgoing messages and store mutations.
pub struct Router {
    pub config: AppConfig,
    bot_username: String,
    assets: AssetStore,
    unlocks: UnlockStore,
    restricted: RestrictedChats,
}

impl Router {
    pub fn new(
        config: AppConfig,
        bot_username: String,
        assets: AssetStore,
        unlocks: UnlockStore,
        restricted: RestrictedChats,
    ) -> Self {
        Self {
            config,
            bot_username,
            assets,
            unlocks,
            restricted,
        }
    }

    pub async fn tier(&self, chat_id: i64) -> Tier {
        if self.unlocks.contains(chat_id).await {
            return Tier::Unlocked;
        }
        match self.restricted.entry(chat_id).await {
            Some(entry) => Tier::Restricted { entry },
            None => Tier::Free,
        }
    }

    // ── /start ─────────────────────────────────────────────────────

    pub async fn start(&self, chat_id: i64, payload: &str) -> Vec<Outgoing> {
        let tier = self.tier(chat_id).await;
        if tier == Tier::Unlocked {
            return self.full_menu(tier).await;
        }

        match DeepLink::parse(payload) {
            DeepLink::Only(key) => match self.assets.get_url(key).await {
                Some(url) => {
                    self.restricted.restrict(chat_id, key).await;
                    vec![self.document(key, url), self.paywall()]
                }
                None => vec![Outgoing::reply(NOT_CONFIGURED)],
            },
            DeepLink::OnlyUnknown => vec![Outgoing::reply(NOT_CONFIGURED)],
            DeepLink::Doc(key) => self.show(tier, key).await,
            DeepLink::None => self.full_menu(tier).await,
        }
    }

    /// A menu button (or bare-key deep link) asking for one document.
    pub async fn show_document(&self, chat_id: i64, key: DocKey) -> Vec<Outgoing> {
        let tier = self.tier(chat_id).await;
        self.show(tier, key).await
    }

    async fn show(&self, tier: Tier, key: DocKey) -> Vec<Outgoing> {
        let url = self.assets.get_url(key).await;
        match access::decide(tier, key, url) {
            Decision::Reveal { url } => vec![self.document(key, url)],
            Decision::RevealWithUpsell { url } => vec![self.document(key, url), self.paywall()],
            Decision::Paywall => vec![self.locked()],
            Decision::NotConfigured => vec![Outgoing::reply(NOT_CONFIGURED)],
        }
    }

    /// `/docs`: every configured link at once.
    pub async fn docs(&self, chat_id: i64) -> Vec<Outgoing> {
        match self.tier(chat_id).await {
            Tier::Restricted { .. } => vec![self.locked()],
            Tier::Free => vec![
                Outgoing::reply("Выберите материал:").with(self.quick_links().await),
                self.paywall(),
            ],
            Tier::Unlocked => {
                vec![Outgoing::reply("Выберите материал:").with(self.quick_links().await)]
            }
        }
    }

    /// Plain text: a menu button label, or anything else.
    pub async fn menu_text(&self, chat_id: i64, text: &str) -> Vec<Outgoing> {
        if text == ABOUT_LABEL {
            return self.about();
        }
        match DocKey::from_menu_label(text) {
            Some(key) => {
                tracing::debug!("Chat {} asked for {}", chat_id, key);
                self.show_document(chat_id, key).await
            }
            None => self.unknown_text(),
        }
    }

    pub fn about(&self) -> Vec<Outgoing> {
        vec![Outgoing::reply(format!(
            "Агентство Cherepkova Event 💍\nОрганизация свадеб под ключ по фиксированной цене.\n{}",
            self.config.about_url
        ))]
    }

    pub fn unknown_text(&self) -> Vec<Outgoing> {
        vec![Outgoing::reply("Не понял 🙈 Нажмите /start, чтобы открыть меню.")]
    }

    // ── Admin commands ─────────────────────────────────────────────

    pub fn admin_only(&self) -> Vec<Outgoing> {
        vec![Outgoing::reply("⛔ Команда доступна только администраторам.")]
    }

    pub async fn set_url(&self, args: &str) -> Vec<Outgoing> {
        let (key, url) = match parse_set_url(args) {
            Ok(parsed) => parsed,
            Err(e) => return vec![Outgoing::reply(e.to_string())],
        };
        if let Err(e) = self.assets.set_url(key, &url).await {
            tracing::error!("Failed to save URL for {}: {:#}", key, e);
            return vec![Outgoing::reply(format!(
                "❌ Не удалось сохранить URL для {}. Подробности в логах.",
                key
            ))];
        }
        vec![Outgoing::reply(format!("URL для {} сохранён ✅", key))]
    }

    /// Channel post whose buttons deep-link back into the bot.
    pub fn post(&self) -> Vec<Outgoing> {
        let mut text = String::from("Готовитесь к свадьбе? Забирайте полезные материалы 👇\n");
        for key in DocKey::ALL {
            text.push_str(&format!("• {}\n", key.title()));
        }

        let buttons = DocKey::ALL
            .into_iter()
            .map(|key| LinkButton {
                text: key.menu_label().to_string(),
                url: self.deep_link(key),
            })
            .collect();

        vec![
            Outgoing::reply(text.trim_end())
                .with(Markup::Links(buttons))
                .into_channel(),
            Outgoing::reply("Пост отправлен в канал ✅"),
        ]
    }

    /// Channel post whose buttons open the documents directly.
    pub async fn post_direct(&self) -> Vec<Outgoing> {
        let configured = self.assets.configured().await;
        if configured.is_empty() {
            return vec![Outgoing::reply("Не заданы ссылки на материалы (/seturl).")];
        }

        let buttons = configured
            .into_iter()
            .map(|(key, url)| LinkButton {
                text: format!("Открыть: {}", key.menu_label()),
                url,
            })
            .collect();

        vec![
            Outgoing::reply("Полезные материалы по подготовке к свадьбе 👇")
                .with(Markup::Links(buttons))
                .into_channel(),
            Outgoing::reply("Пост с прямыми ссылками отправлен в канал ✅"),
        ]
    }

    // ── Payments ───────────────────────────────────────────────────

    pub fn purchase(&self) -> Purchase {
        let Some(provider_token) = self.config.provider_token.clone() else {
            return Purchase::Manual(Outgoing::reply(format!(
                "Онлайн-оплата пока недоступна. Напишите менеджеру {}, и мы откроем доступ вручную.",
                self.config.manager_contact
            )));
        };

        Purchase::Invoice(Invoice {
            title: "Все материалы".to_string(),
            description: "Постоянный доступ ко всем материалам по подготовке к свадьбе."
                .to_string(),
            payload: UNLOCK_PAYLOAD.to_string(),
            provider_token,
            currency: self.config.currency.clone(),
            label: "Доступ ко всем материалам".to_string(),
            amount: self.config.price_minor_units(),
        })
    }

    /// The platform confirmed the payment. The money is already taken, so a
    /// failed unlock write still lifts only mode and answers the user.
    pub async fn payment_succeeded(&self, chat_id: i64, payload: &str) -> Vec<Outgoing> {
        if payload != UNLOCK_PAYLOAD {
            tracing::warn!(
                "Chat {} paid for unexpected payload {:?}, unlocking anyway",
                chat_id,
                payload
            );
        }

        let saved = self.unlocks.add(chat_id).await;
        self.restricted.clear(chat_id).await;

        match saved {
            Ok(true) => tracing::info!("Chat {} unlocked all materials", chat_id),
            Ok(false) => {}
            Err(e) => {
                tracing::error!("Chat {} paid but the unlock was not saved: {:#}", chat_id, e);
                return vec![Outgoing::reply(format!(
                    "Оплата прошла ✅ Доступ не удалось открыть автоматически, \
                     напишите менеджеру {}, и мы откроем материалы вручную.",
                    self.config.manager_contact
                ))
                .with(Markup::MainMenu)];
            }
        }

        vec![
            Outgoing::reply("Оплата прошла ✅ Все материалы открыты!").with(Markup::MainMenu),
            Outgoing::reply("Быстрые ссылки:").with(self.quick_links().await),
        ]
    }

    // ── Building blocks ────────────────────────────────────────────

    async fn full_menu(&self, tier: Tier) -> Vec<Outgoing> {
        let mut out = vec![
            Outgoing::reply("Привет! Я отправлю нужные ссылки. Выберите:").with(Markup::MainMenu),
        ];
        if !matches!(tier, Tier::Restricted { .. }) {
            out.push(Outgoing::reply("Быстрые ссылки:").with(self.quick_links().await));
        }
        if tier != Tier::Unlocked {
            out.push(self.paywall());
        }
        out
    }

    fn document(&self, key: DocKey, url: String) -> Outgoing {
        Outgoing::reply(format!("{}\nНажмите кнопку ниже:", key.title())).with(Markup::Links(
            vec![LinkButton {
                text: format!("Открыть: {}", key.title()),
                url,
            }],
        ))
    }

    async fn quick_links(&self) -> Markup {
        let buttons: Vec<LinkButton> = self
            .assets
            .configured()
            .await
            .into_iter()
            .map(|(key, url)| LinkButton {
                text: key.menu_label().to_string(),
                url,
            })
            .collect();

        if buttons.is_empty() {
            return Markup::Links(vec![LinkButton {
                text: "Ссылки не настроены".to_string(),
                url: self.bot_page(),
            }]);
        }
        Markup::Links(buttons)
    }

    fn price_label(&self) -> String {
        match self.config.currency.as_str() {
            "RUB" => format!("{} ₽", self.config.price),
            other => format!("{} {}", self.config.price, other),
        }
    }

    pub fn paywall(&self) -> Outgoing {
        let price = self.price_label();
        Outgoing::reply(format!(
            "🔓 Все материалы сразу за {}. Оплата один раз, доступ навсегда.",
            price
        ))
        .with(Markup::Buy {
            label: format!("💳 Открыть все материалы за {}", price),
        })
    }

    fn locked(&self) -> Outgoing {
        let mut out = self.paywall();
        out.text = format!("🔒 Этот материал доступен после оплаты.\n\n{}", out.text);
        out
    }

    fn deep_link(&self, key: DocKey) -> String {
        format!("https://t.me/{}?start={}", self.bot_username, key)
    }

    fn bot_page(&self) -> String {
        if self.bot_username.is_empty() {
            "https://t.me".to_string()
        } else {
            format!("https://t.me/{}", self.bot_username)
        }
    }
}
