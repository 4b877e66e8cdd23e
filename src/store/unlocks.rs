use std::collections::BTreeSet;
use std::path::PathBuf;

use tokio::sync::RwLock;

/// Chats that paid for full access. Persisted as a JSON array of chat ids.
/// There is no removal: an unlock is permanent.
#[derive(Debug)]
pub struct UnlockStore {
    path: PathBuf,
    chats: RwLock<BTreeSet<i64>>,
}

impl UnlockStore {
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let chats: BTreeSet<i64> = super::read_json(&path).await.unwrap_or_default();
        tracing::info!("Loaded {} unlocked chats from {:?}", chats.len(), path);
        Self {
            path,
            chats: RwLock::new(chats),
        }
    }

    pub async fn contains(&self, chat_id: i64) -> bool {
        self.chats.read().await.contains(&chat_id)
    }

    /// Returns `true` if the chat was not unlocked before. The in-memory set
    /// only changes once the new snapshot is on disk.
    pub async fn add(&self, chat_id: i64) -> anyhow::Result<bool> {
        let mut chats = self.chats.write().await;
        let mut next = chats.clone();
        let inserted = next.insert(chat_id);
        super::write_json(&self.path, &next).await?;
        *chats = next;
        Ok(inserted)
    }
}
