//! Local media store for uploaded images.
//!
//! Files land under `<data_dir>/<dir_name>/<path>` and are served back by
//! the API under `/media/<path>`.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use heartspace_core::config::MediaConfig;
use heartspace_core::error::HeartspaceError;

/// URL prefix uploaded files are served under.
pub const MEDIA_URL_PREFIX: &str = "/media";

/// Filesystem-backed media store.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    config: MediaConfig,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, config: MediaConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Directory uploads are written into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.config.max_upload_bytes
    }

    /// Store `bytes` at the relative `path` and return its public URL.
    ///
    /// Oversized blobs are rejected before anything touches the disk.
    /// Existing files at the same path are replaced.
    pub fn upload(&self, bytes: &[u8], path: &str) -> Result<String, HeartspaceError> {
        let limit = self.config.max_upload_bytes;
        if bytes.len() > limit {
            return Err(HeartspaceError::PayloadTooLarge {
                size: bytes.len(),
                limit,
            });
        }
        if bytes.is_empty() {
            return Err(HeartspaceError::Validation("upload is empty".to_string()));
        }

        let relative = self.check_path(path)?;
        let target = relative.iter().fold(self.root.clone(), |dir, part| dir.join(part));
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, bytes)?;

        let url = format!("{}/{}", MEDIA_URL_PREFIX, relative.join("/"));
        info!(url = %url, size = bytes.len(), "Media uploaded");
        Ok(url)
    }

    /// Split `path` into safe components and check its extension.
    fn check_path(&self, path: &str) -> Result<Vec<String>, HeartspaceError> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(HeartspaceError::Validation("upload path is required".to_string()));
        }
        if trimmed.contains('\\') {
            return Err(HeartspaceError::Media(format!(
                "invalid upload path: {}",
                path
            )));
        }

        let mut parts = Vec::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => match part.to_str() {
                    Some(part) => parts.push(part.to_string()),
                    None => {
                        return Err(HeartspaceError::Media(format!(
                            "invalid upload path: {}",
                            path
                        )))
                    }
                },
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    debug!(path, "Rejected media path outside the store");
                    return Err(HeartspaceError::Media(format!(
                        "upload path must stay inside the media directory: {}",
                        path
                    )));
                }
            }
        }

        let file_name = parts
            .last()
            .ok_or_else(|| HeartspaceError::Validation("upload path is required".to_string()))?;
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !self
            .config
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
        {
            return Err(HeartspaceError::Validation(format!(
                "file type '{}' is not allowed",
                extension
            )));
        }

        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store(dir: &Path) -> LocalMediaStore {
        LocalMediaStore::new(
            dir.join("media"),
            MediaConfig {
                max_upload_bytes: 16,
                ..MediaConfig::default()
            },
        )
    }

    #[test]
    fn test_upload_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());

        let url = store.upload(b"fake png", "avatars/u1.png").unwrap();
        assert_eq!(url, "/media/avatars/u1.png");
        let written = std::fs::read(store.root().join("avatars").join("u1.png")).unwrap();
        assert_eq!(written, b"fake png");
    }

    #[test]
    fn test_upload_too_large_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());

        let err = store.upload(&[0u8; 17], "big.png").unwrap_err();
        assert!(matches!(
            err,
            HeartspaceError::PayloadTooLarge { size: 17, limit: 16 }
        ));
        assert!(!store.root().exists());
    }

    #[test]
    fn test_upload_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());

        for path in ["../escape.png", "a/../../b.png", "/etc/x.png", "a\\b.png"] {
            let err = store.upload(b"x", path).unwrap_err();
            assert!(matches!(err, HeartspaceError::Media(_)), "accepted {path}");
        }
        assert!(!dir.path().join("escape.png").exists());
    }

    #[test]
    fn test_upload_rejects_disallowed_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());

        for path in ["script.sh", "noext", "photo.png.exe"] {
            assert!(matches!(
                store.upload(b"x", path),
                Err(HeartspaceError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_upload_extension_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        assert_eq!(store.upload(b"x", "./Photo.JPG").unwrap(), "/media/Photo.JPG");
    }

    #[test]
    fn test_upload_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_store(dir.path());
        assert!(matches!(
            store.upload(b"", "a.png"),
            Err(HeartspaceError::Validation(_))
        ));
        assert!(matches!(
            store.upload(b"x", "  "),
            Err(HeartspaceError::Validation(_))
        ));
    }
}
