use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

pub const DEFAULT_UPLOAD_PREFIX: &str = "/uploads";

/// Process configuration, read once at startup. The storage backend is an
/// explicit choice here, never inferred from the runtime environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Include raw error detail in write-path responses.
    pub debug_errors: bool,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageConfig {
    Remote {
        base_url: String,
        service_key: String,
        bucket: String,
    },
    Local {
        dir: PathBuf,
        public_prefix: String,
    },
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL env var is missing")?;
        let admin_username =
            env::var("ADMIN_USERNAME").context("ADMIN_USERNAME env var is missing")?;
        let admin_password =
            env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD env var is missing")?;

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let debug_errors = app_env != "production";

        let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "local".to_string());
        let serverless = env::var("DEPLOYMENT")
            .map(|v| v == "serverless")
            .unwrap_or(false);
        let storage = select_storage(
            &backend,
            serverless,
            env::var("STORAGE_URL").ok(),
            env::var("STORAGE_SERVICE_KEY").ok(),
            env::var("STORAGE_BUCKET").ok(),
            env::var("UPLOAD_DIR").ok(),
        )?;

        Ok(Self {
            port,
            database_url,
            admin_username,
            admin_password,
            debug_errors,
            storage,
        })
    }
}

/// Pick the storage backend from explicit settings. Local disk does not
/// exist in a serverless deployment, so that combination fails fast with an
/// actionable message instead of failing on the first upload.
fn select_storage(
    backend: &str,
    serverless: bool,
    storage_url: Option<String>,
    service_key: Option<String>,
    bucket: Option<String>,
    upload_dir: Option<String>,
) -> Result<StorageConfig> {
    match backend {
        "remote" => Ok(StorageConfig::Remote {
            base_url: storage_url.context("STORAGE_BACKEND=remote requires STORAGE_URL")?,
            service_key: service_key
                .context("STORAGE_BACKEND=remote requires STORAGE_SERVICE_KEY")?,
            bucket: bucket.unwrap_or_else(|| "uploads".to_string()),
        }),
        "local" => {
            if serverless {
                bail!(
                    "STORAGE_BACKEND=local cannot be used with DEPLOYMENT=serverless: \
                     the local filesystem is not durable there. Set STORAGE_BACKEND=remote \
                     with STORAGE_URL and STORAGE_SERVICE_KEY instead."
                );
            }
            Ok(StorageConfig::Local {
                dir: PathBuf::from(upload_dir.unwrap_or_else(|| "public/uploads".to_string())),
                public_prefix: DEFAULT_UPLOAD_PREFIX.to_string(),
            })
        }
        other => bail!("unknown STORAGE_BACKEND `{other}` (expected `remote` or `local`)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_backend_defaults() {
        let storage = select_storage("local", false, None, None, None, None).unwrap();
        assert_eq!(
            storage,
            StorageConfig::Local {
                dir: PathBuf::from("public/uploads"),
                public_prefix: "/uploads".to_string(),
            }
        );
    }

    #[test]
    fn local_backend_fails_fast_when_serverless() {
        let err = select_storage("local", true, None, None, None, None).unwrap_err();
        assert!(err.to_string().contains("STORAGE_BACKEND=remote"));
    }

    #[test]
    fn remote_backend_requires_url_and_key() {
        assert!(select_storage("remote", true, None, None, None, None).is_err());
        let storage = select_storage(
            "remote",
            true,
            Some("https://proj.supabase.co".to_string()),
            Some("key".to_string()),
            None,
            None,
        )
        .unwrap();
        match storage {
            StorageConfig::Remote { bucket, .. } => assert_eq!(bucket, "uploads"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(select_storage("s3", false, None, None, None, None).is_err());
    }
}
