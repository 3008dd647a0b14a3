use anyhow::{Context, Result, anyhow};
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    config::Config,
    storage::AssetStore,
    store::BulletinStore,
    viewer::read_path::{ReadPath, SessionCache},
};

#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    store: BulletinStore,
    read_path: ReadPath<BulletinStore>,
    assets: AssetStore,
    admin_username: String,
    admin_password_hash: String,
    debug_errors: bool,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("failed to connect to Postgres")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        let admin_password_hash = crate::web::auth::hash_password(&config.admin_password)
            .map_err(|err| anyhow!("failed to hash admin password: {err}"))?;

        let store = BulletinStore::new(pool.clone());
        let read_path = ReadPath::new(SessionCache::new(), store.clone());
        let assets = AssetStore::from_config(&config.storage);

        Ok(Self {
            pool,
            store,
            read_path,
            assets,
            admin_username: config.admin_username.clone(),
            admin_password_hash,
            debug_errors: config.debug_errors,
        })
    }

    pub fn pool_ref(&self) -> &PgPool {
        &self.pool
    }

    pub fn store(&self) -> &BulletinStore {
        &self.store
    }

    pub fn read_path(&self) -> &ReadPath<BulletinStore> {
        &self.read_path
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn debug_errors(&self) -> bool {
        self.debug_errors
    }

    /// Check the presented credentials against the configured admin account.
    pub fn verify_admin(&self, username: &str, password: &str) -> bool {
        username == self.admin_username
            && crate::web::auth::verify_password(password, &self.admin_password_hash)
    }
}
