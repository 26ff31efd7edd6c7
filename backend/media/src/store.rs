//! On-disk upload store.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use textlens_core::UploadNaming;

/// Longest extension carried over from a client filename.
const MAX_EXTENSION_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid upload filename: {0:?}")]
    InvalidName(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of persisting one upload.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// File name inside the upload directory.
    pub stored_name: String,
    pub path: PathBuf,
    pub original_name: Option<String>,
    pub size_bytes: usize,
}

/// Append-only directory of uploaded files. Nothing is ever deleted.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    naming: UploadNaming,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, naming: UploadNaming) -> Self {
        Self {
            dir: dir.into(),
            naming,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn naming(&self) -> UploadNaming {
        self.naming
    }

    /// Create the upload directory if needed.
    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })
    }

    /// Pick the on-disk name for an upload whose client filename is
    /// `client_name`.
    pub fn stored_name(&self, client_name: Option<&str>) -> Result<String, StoreError> {
        match self.naming {
            UploadNaming::ServerAssigned => {
                let id = Uuid::new_v4();
                Ok(match client_name.and_then(extension_of) {
                    Some(ext) => format!("{id}.{ext}"),
                    None => id.to_string(),
                })
            }
            UploadNaming::ClientFilename => {
                let raw = client_name.unwrap_or_default();
                client_basename(raw)
                    .map(str::to_string)
                    .ok_or_else(|| StoreError::InvalidName(raw.to_string()))
            }
        }
    }

    /// Write `bytes` verbatim. Under client naming an existing file with the
    /// same name is replaced.
    pub async fn save(
        &self,
        client_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<StoredUpload, StoreError> {
        let stored_name = self.stored_name(client_name)?;
        let path = self.dir.join(&stored_name);

        self.ensure_dir().await?;
        fs::write(&path, bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(StoredUpload {
            stored_name,
            path,
            original_name: client_name.map(str::to_string),
            size_bytes: bytes.len(),
        })
    }

    /// Map a requested file name to a path inside the store, refusing
    /// anything that could escape the directory.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if !is_safe_name(name) {
            debug!(name, "Refusing unsafe upload name");
            return None;
        }
        Some(self.dir.join(name))
    }
}

/// A single path component that stays inside its directory.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Last path component of a client-supplied filename (either separator).
fn client_basename(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    is_safe_name(base).then_some(base)
}

/// Lowercased extension, when short and alphanumeric.
fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}
