use anyhow::{Context, Result, bail};
use reqwest::Client;

use super::UnrecognizedUrl;

/// Supabase-storage-compatible backend: objects live in one public bucket,
/// reached over the storage REST API with a service-role key.
#[derive(Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl RemoteStore {
    pub fn new(base_url: &str, service_key: &str, bucket: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            bucket: bucket.to_string(),
        }
    }

    pub async fn upload(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let endpoint = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, name
        );
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .context("storage upload request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            bail!("storage upload rejected ({status}): {detail}");
        }

        Ok(self.public_url(name))
    }

    pub async fn delete(&self, public_url: &str) -> Result<()> {
        let Some(key) = self.key_from_public_url(public_url) else {
            return Err(UnrecognizedUrl(public_url.to_string()).into());
        };
        let endpoint = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, key
        );
        let response = self
            .client
            .delete(&endpoint)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .context("storage delete request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            bail!("storage delete rejected ({status})");
        }
        Ok(())
    }

    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }

    /// Reverse a public URL back to the object key; `None` when the URL does
    /// not point into this store's bucket.
    pub fn key_from_public_url(&self, public_url: &str) -> Option<String> {
        let prefix = format!(
            "{}/storage/v1/object/public/{}/",
            self.base_url, self.bucket
        );
        let key = public_url.strip_prefix(&prefix)?;
        if key.is_empty() {
            return None;
        }
        Some(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RemoteStore {
        RemoteStore::new("https://proj.supabase.co/", "service-key", "uploads")
    }

    #[test]
    fn public_url_and_key_reverse_each_other() {
        let store = store();
        let url = store.public_url("1738-abc123.png");
        assert_eq!(
            url,
            "https://proj.supabase.co/storage/v1/object/public/uploads/1738-abc123.png"
        );
        assert_eq!(
            store.key_from_public_url(&url).as_deref(),
            Some("1738-abc123.png")
        );
    }

    #[test]
    fn foreign_urls_do_not_reverse() {
        let store = store();
        assert!(store.key_from_public_url("/uploads/a.png").is_none());
        assert!(
            store
                .key_from_public_url("https://other.example/storage/v1/object/public/uploads/a.png")
                .is_none()
        );
        assert!(
            store
                .key_from_public_url(
                    "https://proj.supabase.co/storage/v1/object/public/uploads/"
                )
                .is_none()
        );
    }
}
