pub mod assets;
pub mod unlocks;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

pub use assets::AssetStore;
pub use unlocks::UnlockStore;

/// Read a whole JSON file. A missing or unparsable file yields `None`;
/// the caller starts from an empty store in that case.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("{:?} not found, starting empty", path);
            return None;
        }
        Err(e) => {
            tracing::warn!("Failed to read {:?}: {}. Starting empty", path, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}. Starting empty", path, e);
            None
        }
    }
}

/// Rewrite the whole file with a pretty-printed snapshot.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).await?;
    Ok(())
}
