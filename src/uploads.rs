//! Attachment storage for invoice payment proofs.

use crate::error::AppError;
use crate::service::UploadedFile;
use rand::RngCore;
use std::path::{Path, PathBuf};

/// Reference prefix when the upload directory has no usable final component (e.g. `/`).
pub const DEFAULT_REFERENCE_PREFIX: &str = "uploads";

/// A file written by [`FileStore::save`].
#[derive(Clone, Debug)]
pub struct StoredFile {
    pub path: PathBuf,
    /// `<dir name>/<16 hex>.<ext>`, e.g. `uploads/3f0c9a1b2d4e5f60.jpg`
    pub reference: String,
}

/// Upload directory plus the public prefix stored in the database. The prefix is the
/// directory's own name, so `UPLOAD_DIR=/srv/www/bukti` yields `bukti/<name>`.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
    prefix: String,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let prefix = dir
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_REFERENCE_PREFIX)
            .to_string();
        FileStore { dir, prefix }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn reference_prefix(&self) -> &str {
        &self.prefix
    }

    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write the upload under a random name keeping the original extension.
    pub async fn save(&self, file: &UploadedFile) -> Result<StoredFile, AppError> {
        self.ensure_dir().await?;
        let name = random_name(extension(&file.file_name));
        let path = self.dir.join(&name);
        tokio::fs::write(&path, &file.bytes).await?;
        tracing::info!(path = %path.display(), bytes = file.bytes.len(), "stored upload");
        Ok(StoredFile {
            path,
            reference: format!("{}/{}", self.prefix, name),
        })
    }

    /// Remove a file no stored row refers to.
    pub async fn discard(&self, stored: &StoredFile) {
        match tokio::fs::remove_file(&stored.path).await {
            Ok(()) => tracing::debug!(path = %stored.path.display(), "discarded upload"),
            Err(e) => tracing::warn!(path = %stored.path.display(), error = %e, "could not remove orphaned upload"),
        }
    }
}

/// Extension of the client file name, only if plain alphanumeric.
fn extension(file_name: &str) -> Option<&str> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn random_name(ext: Option<&str>) -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    let stem = hex::encode(bytes);
    match ext {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}
