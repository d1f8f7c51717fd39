//! Asset hosting.
//!
//! The editor and profile endpoints treat the asset host as an opaque
//! contract: hand over bytes, get back a public URL. Failures collapse to a
//! single generic error, except the size cap which callers surface as a
//! validation problem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("upload exceeds the {limit_bytes} byte limit")]
    TooLarge { limit_bytes: usize },
    #[error("upload failed")]
    Upload(#[source] std::io::Error),
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store the bytes under a fresh name and return their public URL.
    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String, AssetError>;
}

/// Disk-backed asset store; the files are served under `/assets`.
pub struct LocalAssetStore {
    root: PathBuf,
    base_url: String,
    max_bytes: usize,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sanitize(filename: &str) -> String {
        let cleaned: String = filename
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if cleaned.is_empty() {
            "upload".to_string()
        } else {
            cleaned
        }
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<String, AssetError> {
        if bytes.len() > self.max_bytes {
            return Err(AssetError::TooLarge {
                limit_bytes: self.max_bytes,
            });
        }

        let name = format!("{}_{}", Uuid::new_v4(), Self::sanitize(filename));
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(AssetError::Upload)?;
        tokio::fs::write(self.root.join(&name), bytes)
            .await
            .map_err(AssetError::Upload)?;

        Ok(format!(
            "{}/assets/{}",
            self.base_url.trim_end_matches('/'),
            name
        ))
    }
}
