use std::sync::Arc;

use anyhow::Context;
use mongodb::bson::doc;
use mongodb::{Client, Database};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connects to MongoDB and pings it once. An unreachable store is a
    /// startup failure, not something to limp along without.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let client = Client::with_uri_str(&config.mongo_uri)
            .await
            .context("connect to mongodb")?;
        let db = client.database(&config.mongo_db);

        db.run_command(doc! { "ping": 1 })
            .await
            .context("ping mongodb")?;
        tracing::info!(database = %config.mongo_db, "connected to mongodb");
        tracing::debug!(secret_len = config.secret_key.len(), "secret key loaded");

        Ok(Self { db, config })
    }
}
