use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::UnrecognizedUrl;

/// Local-disk backend: files under one directory, public URLs under a fixed
/// prefix (served by the web layer). Development fallback for the remote
/// object store.
#[derive(Clone)]
pub struct LocalStore {
    dir: PathBuf,
    public_prefix: String,
}

impl LocalStore {
    pub fn new(dir: PathBuf, public_prefix: &str) -> Self {
        Self {
            dir,
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to ensure upload dir at {}", self.dir.display()))?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write upload at {}", path.display()))?;
        Ok(format!("{}/{}", self.public_prefix, name))
    }

    pub async fn delete(&self, public_url: &str) -> Result<()> {
        let Some(path) = self.file_path(public_url) else {
            return Err(UnrecognizedUrl(public_url.to_string()).into());
        };
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("failed to remove upload at {}", path.display()))
    }

    /// Reverse a public URL to the on-disk path. Only the file name is used,
    /// so `..` segments cannot escape the upload directory.
    pub fn file_path(&self, public_url: &str) -> Option<PathBuf> {
        let rest = public_url.strip_prefix(&self.public_prefix)?;
        let rest = rest.strip_prefix('/')?;
        let name = Path::new(rest).file_name()?;
        Some(self.dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_delete_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::new(tmp.path().to_path_buf(), "/uploads");

        let url = store
            .upload("1738-abc123.png", b"fake png".to_vec())
            .await
            .unwrap();
        assert_eq!(url, "/uploads/1738-abc123.png");
        assert!(tmp.path().join("1738-abc123.png").exists());

        store.delete(&url).await.unwrap();
        assert!(!tmp.path().join("1738-abc123.png").exists());
    }

    #[tokio::test]
    async fn foreign_prefix_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalStore::new(tmp.path().to_path_buf(), "/uploads");
        let err = store
            .delete("https://elsewhere.example/object/x.png")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("삭제할 수 없는"));
    }

    #[test]
    fn traversal_segments_cannot_escape_the_dir() {
        let store = LocalStore::new(PathBuf::from("/srv/uploads"), "/uploads");
        let path = store.file_path("/uploads/../../etc/passwd").unwrap();
        assert_eq!(path, PathBuf::from("/srv/uploads/passwd"));
    }

    #[test]
    fn file_path_requires_the_prefix() {
        let store = LocalStore::new(PathBuf::from("/srv/uploads"), "/uploads");
        assert!(store.file_path("/other/a.png").is_none());
        assert!(store.file_path("a.png").is_none());
    }
}
