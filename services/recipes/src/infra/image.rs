use std::path::PathBuf;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::ImageStore;
use crate::domain::types::ImagePayload;
use crate::error::RecipesServiceError;

/// Directory under the media root that recipe images are written to.
pub const IMAGE_DIR: &str = "recipes/images";

/// Writes images to `<media_root>/recipes/images/<uuid>.<ext>`.
#[derive(Clone)]
pub struct FsImageStore {
    pub media_root: PathBuf,
}

impl ImageStore for FsImageStore {
    async fn save(&self, image: &ImagePayload) -> Result<String, RecipesServiceError> {
        let reference = format!("{IMAGE_DIR}/{}.{}", Uuid::now_v7(), image.extension);
        let path = self.media_root.join(&reference);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create image directory {}", parent.display()))?;
        }
        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("write image {}", path.display()))?;
        tracing::debug!(%reference, bytes = image.bytes.len(), "image stored");
        Ok(reference)
    }

    async fn delete(&self, reference: &str) -> Result<(), RecipesServiceError> {
        let path = self.media_root.join(reference);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(%reference, "image removed");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(anyhow::Error::new(err)
                .context(format!("remove image {}", path.display()))
                .into()),
        }
    }
}
