//! # Local filesystem object storage
//!
//! Stores originals under a root directory and issues URLs under a public
//! prefix the web layer serves statically.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use domains::{GatewayError, MediaStorage, Result};
use tokio::fs;
use tracing::debug;

use crate::sniff::require_image;

pub struct LocalMediaStorage {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root: PathBuf,
    /// Public URL prefix (e.g., "/static/uploads")
    url_prefix: String,
}

impl LocalMediaStorage {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Storage paths are relative and may not climb out of the root.
    fn target(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let clean = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(GatewayError::Validation(format!(
                "invalid storage path: {path}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn upload(&self, path: String, data: Bytes, content_type: mime::Mime) -> Result<()> {
        require_image(&data, &content_type)?;
        let target = self.target(&path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| GatewayError::Storage(e.to_string()))?;
        }
        fs::write(&target, &data)
            .await
            .map_err(|e| GatewayError::Storage(e.to_string()))?;
        debug!(%path, bytes = data.len(), "stored upload");
        Ok(())
    }

    async fn remove(&self, path: String) -> Result<()> {
        let target = self.target(&path)?;
        match fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GatewayError::Storage(e.to_string())),
        }
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.url_prefix, path)
    }

    fn storage_path(&self, public_url: &str) -> Option<String> {
        public_url
            .strip_prefix(&self.url_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n0000";

    fn store() -> (LocalMediaStorage, PathBuf) {
        let root = std::env::temp_dir().join(format!("hobbylog-media-{}", Uuid::new_v4()));
        (
            LocalMediaStorage::new(root.clone(), "/static/uploads".to_string()),
            root,
        )
    }

    #[tokio::test]
    async fn upload_writes_and_remove_deletes() {
        let (store, root) = store();
        store
            .upload(
                "acc/post/1.png".to_string(),
                Bytes::from_static(PNG),
                mime::IMAGE_PNG,
            )
            .await
            .unwrap();
        assert!(root.join("acc/post/1.png").exists());

        store.remove("acc/post/1.png".to_string()).await.unwrap();
        assert!(!root.join("acc/post/1.png").exists());
        // Best-effort: removing again is quiet.
        store.remove("acc/post/1.png".to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn climbing_paths_are_rejected() {
        let (store, _root) = store();
        let err = store
            .upload(
                "../escape.png".to_string(),
                Bytes::from_static(PNG),
                mime::IMAGE_PNG,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[test]
    fn url_round_trip() {
        let (store, _root) = store();
        let url = store.public_url("acc/post/1.png");
        assert_eq!(store.storage_path(&url).as_deref(), Some("acc/post/1.png"));
    }
}
