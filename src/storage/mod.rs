mod local;
mod remote;

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

pub use local::LocalStore;
pub use remote::RemoteStore;

use crate::config::StorageConfig;

/// Returned when a delete request names a URL that does not reverse to a
/// key in the configured backend. Callers reject these instead of silently
/// ignoring them — ignoring would leak storage objects.
#[derive(Debug)]
pub struct UnrecognizedUrl(pub String);

impl std::fmt::Display for UnrecognizedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "삭제할 수 없는 URL입니다: {}", self.0)
    }
}

impl std::error::Error for UnrecognizedUrl {}

/// Binary asset storage behind one of two interchangeable backends, chosen
/// at process start by explicit configuration.
#[derive(Clone)]
pub enum AssetStore {
    Remote(RemoteStore),
    Local(LocalStore),
}

impl AssetStore {
    pub fn from_config(config: &StorageConfig) -> Self {
        match config {
            StorageConfig::Remote {
                base_url,
                service_key,
                bucket,
            } => AssetStore::Remote(RemoteStore::new(base_url, service_key, bucket)),
            StorageConfig::Local { dir, public_prefix } => {
                AssetStore::Local(LocalStore::new(dir.clone(), public_prefix))
            }
        }
    }

    /// Store the bytes under a collision-resistant name and return the
    /// public URL.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        original_name: &str,
        content_type: &str,
    ) -> Result<String> {
        let name = object_name(original_name);
        match self {
            AssetStore::Remote(store) => store.upload(&name, bytes, content_type).await,
            AssetStore::Local(store) => store.upload(&name, bytes).await,
        }
    }

    /// Delete the object behind a public URL. URLs that do not reverse to an
    /// internal key are rejected with a described error — silently ignoring
    /// them would leak storage objects.
    pub async fn delete(&self, public_url: &str) -> Result<()> {
        match self {
            AssetStore::Remote(store) => store.delete(public_url).await,
            AssetStore::Local(store) => store.delete(public_url).await,
        }
    }

    /// Local file path for a `/uploads/...` URL; `None` under the remote
    /// backend (those files live off-host).
    pub fn local_file_path(&self, public_url: &str) -> Option<std::path::PathBuf> {
        match self {
            AssetStore::Local(store) => store.file_path(public_url),
            AssetStore::Remote(_) => None,
        }
    }
}

/// `{epoch-millis}-{random}.{ext}` — collision-resistant, extension kept so
/// browsers and the content-type sniffer stay happy. `.jpg` fallback matches
/// the original upload behavior.
fn object_name(original_name: &str) -> String {
    let sanitized = sanitize_filename::sanitize(original_name);
    let ext = std::path::Path::new(&sanitized)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "jpg".to_string());
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        &suffix[..6],
        ext
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_names_preserve_the_extension() {
        let name = object_name("악보 사진.PNG");
        assert!(name.ends_with(".png"), "got {name}");
    }

    #[test]
    fn object_names_default_to_jpg() {
        assert!(object_name("camera-roll").ends_with(".jpg"));
        assert!(object_name("").ends_with(".jpg"));
    }

    #[test]
    fn object_names_differ_across_calls() {
        assert_ne!(object_name("a.png"), object_name("a.png"));
    }
}
