use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::catalog::DocKey;

/// One entry of `assets.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Older files stored the URL directly instead of wrapping it in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAsset {
    Bare(String),
    Full(Asset),
}

impl From<StoredAsset> for Asset {
    fn from(stored: StoredAsset) -> Self {
        match stored {
            StoredAsset::Bare(url) => Asset { url: Some(url) },
            StoredAsset::Full(asset) => asset,
        }
    }
}

/// Document URLs, persisted as a JSON object keyed by document key.
///
/// Keys outside the current catalog are kept as-is so a rewrite never drops
/// data an older deployment wrote.
#[derive(Debug)]
pub struct AssetStore {
    path: PathBuf,
    assets: RwLock<BTreeMap<String, Asset>>,
}

impl AssetStore {
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let assets: BTreeMap<String, Asset> =
            super::read_json::<BTreeMap<String, StoredAsset>>(&path)
                .await
                .map(|raw| raw.into_iter().map(|(k, v)| (k, v.into())).collect())
                .unwrap_or_default();

        tracing::info!("Loaded {} asset entries from {:?}", assets.len(), path);
        Self {
            path,
            assets: RwLock::new(assets),
        }
    }

    pub async fn get_url(&self, key: DocKey) -> Option<String> {
        self.assets
            .read()
            .await
            .get(key.as_str())
            .and_then(|asset| asset.url.clone())
    }

    /// URLs of every configured document, in catalog order.
    pub async fn configured(&self) -> Vec<(DocKey, String)> {
        let assets = self.assets.read().await;
        DocKey::ALL
            .into_iter()
            .filter_map(|key| {
                assets
                    .get(key.as_str())
                    .and_then(|asset| asset.url.clone())
                    .map(|url| (key, url))
            })
            .collect()
    }

    /// Persist first, then swap the new map in, so a failed write changes nothing.
    pub async fn set_url(&self, key: DocKey, url: &str) -> anyhow::Result<()> {
        let mut assets = self.assets.write().await;
        let mut next = assets.clone();
        next.entry(key.as_str().to_string()).or_default().url = Some(url.to_string());
        super::write_json(&self.path, &next).await?;
        *assets = next;
        tracing::info!("URL for {} set to {}", key, url);
        Ok(())
    }
}
