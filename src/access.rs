use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::catalog::DocKey;

/// Where a chat stands with respect to the paywall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Paid: everything is open.
    Unlocked,
    /// Entered through `only:<key>` and hasn't paid; only `entry` may be shown.
    Restricted { entry: DocKey },
    /// Everyone else: documents are shown, with an upsell next to them.
    Free,
}

/// Outcome of asking for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Reveal { url: String },
    RevealWithUpsell { url: String },
    Paywall,
    NotConfigured,
}

/// Pure access decision. A missing URL wins over every tier.
pub fn decide(tier: Tier, key: DocKey, url: Option<String>) -> Decision {
    let Some(url) = url else {
        return Decision::NotConfigured;
    };
    match tier {
        Tier::Unlocked => Decision::Reveal { url },
        Tier::Restricted { entry } if entry == key => Decision::RevealWithUpsell { url },
        Tier::Restricted { .. } => Decision::Paywall,
        Tier::Free => Decision::RevealWithUpsell { url },
    }
}

/// In-memory set of chats in "only" mode, with the document they came in for.
/// Lost on restart.
#[derive(Debug, Default)]
pub struct RestrictedChats {
    chats: RwLock<HashMap<i64, DocKey>>,
}

impl RestrictedChats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter (or re-enter with a new key) restricted mode.
    pub async fn restrict(&self, chat_id: i64, entry: DocKey) {
        let previous = self.chats.write().await.insert(chat_id, entry);
        match previous {
            Some(old) if old != entry => {
                tracing::info!("Chat {} re-entered only mode: {} -> {}", chat_id, old, entry)
            }
            Some(_) => {}
            None => tracing::info!("Chat {} entered only mode for {}", chat_id, entry),
        }
    }

    pub async fn entry(&self, chat_id: i64) -> Option<DocKey> {
        self.chats.read().await.get(&chat_id).copied()
    }

    pub async fn clear(&self, chat_id: i64) {
        if self.chats.write().await.remove(&chat_id).is_some() {
            tracing::debug!("Chat {} left only mode", chat_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Option<String> {
        Some("https://doc".to_string())
    }

    #[test]
    fn free_chats_get_every_document_with_upsell() {
        for key in DocKey::ALL {
            assert_eq!(
                decide(Tier::Free, key, url()),
                Decision::RevealWithUpsell { url: "https://doc".into() }
            );
        }
    }

    #[test]
    fn restricted_chats_only_see_their_entry_document() {
        let tier = Tier::Restricted { entry: DocKey::Checklist };
        for key in DocKey::ALL {
            let decision = decide(tier, key, url());
            if key == DocKey::Checklist {
                assert!(matches!(decision, Decision::RevealWithUpsell { .. }));
            } else {
                assert_eq!(decision, Decision::Paywall);
            }
        }
    }

    #[test]
    fn unlocked_chats_see_everything_without_upsell() {
        for key in DocKey::ALL {
            assert_eq!(
                decide(Tier::Unlocked, key, url()),
                Decision::Reveal { url: "https://doc".into() }
            );
        }
    }

    #[test]
    fn missing_url_is_not_configured_for_every_tier() {
        for tier in [
            Tier::Unlocked,
            Tier::Free,
            Tier::Restricted { entry: DocKey::Venues },
            Tier::Restricted { entry: DocKey::VsDiy },
        ] {
            assert_eq!(decide(tier, DocKey::Venues, None), Decision::NotConfigured);
        }
    }

    #[tokio::test]
    async fn second_only_link_replaces_entry() {
        let restricted = RestrictedChats::new();
        restricted.restrict(7, DocKey::Venues).await;
        restricted.restrict(7, DocKey::BudgetCalc).await;
        assert_eq!(restricted.entry(7).await, Some(DocKey::BudgetCalc));

        restricted.clear(7).await;
        assert_eq!(restricted.entry(7).await, None);
    }
}
