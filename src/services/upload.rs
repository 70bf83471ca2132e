use crate::errors::{AppError, Result};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Maximum accepted image size: 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Public route prefix under which stored files are served back.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Owns the uploads directory and keeps image files in sync with the
/// product records that reference them. Stored references are public paths
/// of the form `/uploads/<filename>`.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    dir: PathBuf,
}

impl UploadStorage {
    /// Creates the uploads directory if it doesn't exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            AppError::IoError(format!(
                "Failed to create uploads directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validates and writes an uploaded image, returning its public path.
    /// Only `image/*` content up to `MAX_IMAGE_BYTES` is accepted; nothing
    /// touches the disk for a rejected upload.
    pub async fn store(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<String> {
        match content_type {
            Some(ct) if ct.starts_with("image/") => {}
            _ => {
                return Err(AppError::UploadError(
                    "Only image files are allowed".to_string(),
                ))
            }
        }
        if data.len() > MAX_IMAGE_BYTES {
            return Err(AppError::UploadError(
                "Image exceeds the 5 MiB size limit".to_string(),
            ));
        }

        let filename = generate_filename(original_name);
        let target = self.dir.join(&filename);
        tokio::fs::write(&target, data).await.map_err(|e| {
            AppError::IoError(format!("Failed to write {}: {}", target.display(), e))
        })?;

        Ok(format!("{}/{}", PUBLIC_PREFIX, filename))
    }

    /// Removes the file behind a stored public path, if it still exists on
    /// disk. Removing an already-missing file is not an error.
    pub async fn remove(&self, public_path: &str) -> Result<()> {
        let Some(target) = self.resolve(public_path) else {
            return Ok(());
        };
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::IoError(format!(
                "Failed to remove {}: {}",
                target.display(),
                e
            ))),
        }
    }

    /// Best-effort removal used on failure paths: a cleanup error is logged
    /// and swallowed so the original error keeps its place.
    pub async fn discard(&self, public_path: &str) {
        if let Err(e) = self.remove(public_path).await {
            warn!(action = "upload_discard_failed", path = %public_path, error = %e);
        }
    }

    pub async fn exists(&self, public_path: &str) -> bool {
        match self.resolve(public_path) {
            Some(target) => tokio::fs::try_exists(&target).await.unwrap_or(false),
            None => false,
        }
    }

    /// Maps `/uploads/<filename>` back to the on-disk path. References that
    /// don't match the stored shape (wrong prefix, embedded separators)
    /// resolve to nothing.
    fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let filename = public_path.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            return None;
        }
        Some(self.dir.join(filename))
    }
}

/// Collision-resistant filename: millisecond timestamp plus a random
/// suffix, preserving the original extension.
fn generate_filename(original_name: Option<&str>) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let ext = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("image-{}-{}{}", millis, suffix, ext)
}
