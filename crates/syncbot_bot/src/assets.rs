//! Emoji image lookup.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use syncbot_error::{AssetError, AssetErrorKind};
use tracing::{debug, instrument};

/// Resolves an emoji name to image bytes.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Load the image for `name`.
    async fn load(&self, name: &str) -> Result<Vec<u8>, AssetError>;
}

/// Reads `<dir>/<name>.png` from disk.
#[derive(Debug, Clone)]
pub struct FileAssetSource {
    dir: PathBuf,
}

impl FileAssetSource {
    /// Create a source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path the image for `name` is expected at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.png", name))
    }
}

#[async_trait]
impl AssetSource for FileAssetSource {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn load(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.path_for(name);

        // Names come from the snapshot; keep lookups inside the asset directory.
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(AssetError::new(AssetErrorKind::NotFound {
                name: name.to_string(),
                path,
            }));
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "Loaded emoji image");
                Ok(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AssetError::new(AssetErrorKind::NotFound {
                    name: name.to_string(),
                    path,
                }))
            }
            Err(e) => Err(AssetError::new(AssetErrorKind::Unreadable {
                path,
                reason: e.to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_reads_png_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("wave.png"), [0x89, b'P', b'N', b'G']).unwrap();
        let source = FileAssetSource::new(dir.path());

        let bytes = source.load("wave").await.unwrap();

        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn test_missing_image_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileAssetSource::new(dir.path());

        let err = source.load("ghost").await.unwrap_err();

        assert!(matches!(err.kind, AssetErrorKind::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileAssetSource::new(dir.path().join("emojis"));
        std::fs::write(dir.path().join("secret.png"), b"x").unwrap();

        let err = source.load("../secret").await.unwrap_err();

        assert!(matches!(err.kind, AssetErrorKind::NotFound { .. }));
    }
}
