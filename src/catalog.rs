use std::fmt;
use std::str::FromStr;

/// The fixed set of marketing documents the bot can hand out.
///
/// Titles and menu labels are compiled in; only the URLs live in the asset store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocKey {
    Venues,
    HiddenCosts,
    VsDiy,
    Checklist,
    BudgetCalc,
    VenueQuestions,
}

/// Label of the "about" button in the main menu.
pub const ABOUT_LABEL: &str = "ℹ️ О нас";

impl DocKey {
    /// Every document, in the order used for quick links and channel posts.
    pub const ALL: [DocKey; 6] = [
        DocKey::Venues,
        DocKey::HiddenCosts,
        DocKey::VsDiy,
        DocKey::Checklist,
        DocKey::BudgetCalc,
        DocKey::VenueQuestions,
    ];

    /// Key as it appears in deep links, `/seturl` and `assets.json`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Venues => "venues",
            Self::HiddenCosts => "hidden_costs",
            Self::VsDiy => "vs_diy",
            Self::Checklist => "checklist",
            Self::BudgetCalc => "budget_calc",
            Self::VenueQuestions => "venue_questions",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Venues => "Загородные площадки без аренды (Екатеринбург)",
            Self::HiddenCosts => "Скрытые расходы свадьбы",
            Self::VsDiy => "Свадьба «под ключ» vs самостоятельная подготовка",
            Self::Checklist => "Бесплатный чек-лист: «Как подготовить свадьбу и ничего не забыть»",
            Self::BudgetCalc => "Как рассчитать свадебный бюджет",
            Self::VenueQuestions => "Какие вопросы задать площадке перед бронированием?",
        }
    }

    /// Text of the reply-keyboard button for this document.
    pub fn menu_label(&self) -> &'static str {
        match self {
            Self::Venues => "🏡 Площадки без аренды",
            Self::HiddenCosts => "💸 Скрытые расходы",
            Self::VsDiy => "⚖️ Под ключ vs DIY",
            Self::Checklist => "🧾 Чек-лист",
            Self::BudgetCalc => "🧮 Бюджет свадьбы",
            Self::VenueQuestions => "❓ Вопросы площадке",
        }
    }

    pub fn from_menu_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.menu_label() == label)
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document key: {0}")]
pub struct UnknownDocKey(pub String);

impl FromStr for DocKey {
    type Err = UnknownDocKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownDocKey(s.to_string()))
    }
}

/// What a `/start` payload asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepLink {
    /// `/start <key>`
    Doc(DocKey),
    /// `/start only:<key>`
    Only(DocKey),
    /// `/start only:<garbage>`: an "only" entry whose key we don't know.
    OnlyUnknown,
    /// No payload, or a payload that isn't a document reference.
    None,
}

impl DeepLink {
    pub fn parse(payload: &str) -> Self {
        let payload = payload.trim();
        if let Some(rest) = payload.strip_prefix("only:") {
            return match rest.trim().parse() {
                Ok(key) => Self::Only(key),
                Err(_) => Self::OnlyUnknown,
            };
        }
        match payload.parse() {
            Ok(key) => Self::Doc(key),
            Err(_) => Self::None,
        }
    }
}
