use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bot_token: String,
    /// Channel for `/post`: `@handle` or numeric chat id.
    pub channel: String,
    /// Public username without `@`. Looked up with getMe when unset.
    pub bot_username: Option<String>,
    /// Payment provider token. Without it purchases go through a manager.
    pub provider_token: Option<String>,
    /// Price of the full bundle in major currency units.
    pub price: u32,
    pub currency: String,

    pub assets_file: String,
    pub unlocked_file: String,

    /// Comma-separated Telegram user IDs allowed to run admin commands.
    /// Empty means anyone can.
    pub admin_ids: Vec<i64>,

    pub about_url: String,
    pub manager_contact: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |name: &str| {
            var(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let admin_ids: Vec<i64> = var("ADMIN_IDS")
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();

        let price: u32 = match non_empty("PRICE") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PRICE must be a whole number, got {:?}", raw))?,
            None => 990,
        };
        if price.checked_mul(100).is_none() {
            anyhow::bail!("PRICE {} is too large for an invoice", price);
        }

        Ok(Self {
            bot_token: non_empty("BOT_TOKEN").context("BOT_TOKEN is not set")?,
            channel: non_empty("CHANNEL").unwrap_or_else(|| "@cherepkovaevent".to_string()),
            bot_username: non_empty("BOT_USERNAME")
                .map(|u| u.trim_start_matches('@').to_string())
                .filter(|u| !u.is_empty()),
            provider_token: non_empty("PROVIDER_TOKEN"),
            price,
            currency: non_empty("CURRENCY").unwrap_or_else(|| "RUB".to_string()),
            assets_file: non_empty("ASSETS_FILE").unwrap_or_else(|| "assets.json".to_string()),
            unlocked_file: non_empty("UNLOCKED_FILE")
                .unwrap_or_else(|| "unlocked.json".to_string()),
            admin_ids,
            about_url: non_empty("ABOUT_URL")
                .unwrap_or_else(|| "https://cherepkovaevent.ru".to_string()),
            manager_contact: non_empty("MANAGER_CONTACT")
                .unwrap_or_else(|| "@cherepkovaevent".to_string()),
        })
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.is_empty() || self.admin_ids.contains(&user_id)
    }

    pub fn payments_enabled(&self) -> bool {
        self.provider_token.is_some()
    }

    /// Invoice amount in the smallest currency unit. `from_env` rejects
    /// prices that would overflow.
    pub fn price_minor_units(&self) -> u32 {
        self.price * 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn bot_token_is_required() {
        let err = config(&[]).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));
        assert!(config(&[("BOT_TOKEN", "  ")]).is_err());
    }

    #[test]
    fn defaults() {
        let cfg = config(&[("BOT_TOKEN", "123:abc")]).unwrap();
        assert_eq!(cfg.channel, "@cherepkovaevent");
        assert_eq!(cfg.bot_username, None);
        assert!(!cfg.payments_enabled());
        assert_eq!(cfg.price, 990);
        assert_eq!(cfg.price_minor_units(), 99_000);
        assert_eq!(cfg.currency, "RUB");
        assert_eq!(cfg.assets_file, "assets.json");
        assert!(cfg.is_admin(42));
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("BOT_TOKEN", "123:abc"),
            ("BOT_USERNAME", "@freecherepkovaevent_bot"),
            ("PROVIDER_TOKEN", "pay"),
            ("PRICE", "1490"),
            ("ADMIN_IDS", "1, 2,x"),
        ])
        .unwrap();
        assert_eq!(cfg.bot_username.as_deref(), Some("freecherepkovaevent_bot"));
        assert!(cfg.payments_enabled());
        assert_eq!(cfg.price_minor_units(), 149_000);
        assert_eq!(cfg.admin_ids, vec![1, 2]);
        assert!(cfg.is_admin(2));
        assert!(!cfg.is_admin(3));
    }

    #[test]
    fn bad_price_is_an_error() {
        assert!(config(&[("BOT_TOKEN", "t"), ("PRICE", "cheap")]).is_err());
    }

    #[test]
    fn price_overflowing_minor_units_is_an_error() {
        let err = config(&[("BOT_TOKEN", "t"), ("PRICE", "50000000")]).unwrap_err();
        assert!(err.to_string().contains("too large"));

        let cfg = config(&[("BOT_TOKEN", "t"), ("PRICE", "42949672")]).unwrap();
        assert_eq!(cfg.price_minor_units(), 4_294_967_200);
    }
}
