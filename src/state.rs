use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::materials::repo::{MaterialStore, PgMaterialStore};

/// Everything the handler layer depends on, injected at startup. The stores
/// are trait objects so tests can swap the Postgres-backed ones out.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub materials: Arc<dyn MaterialStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<(Self, PgPool)> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        let state = Self::from_parts(
            Arc::new(PgUserStore::new(db.clone())),
            Arc::new(PgMaterialStore::new(db.clone())),
            config,
        );
        Ok((state, db))
    }

    pub fn from_parts(
        users: Arc<dyn UserStore>,
        materials: Arc<dyn MaterialStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            materials,
            config,
        }
    }
}
