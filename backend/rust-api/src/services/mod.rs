use std::sync::Arc;

use anyhow::Context;
use mongodb::Client as MongoClient;

use crate::config::{Config, StoreBackend};
use crate::store::{GameStore, InMemoryStore, MongoStore};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn GameStore>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn GameStore> = match config.store_backend {
            StoreBackend::Mongo => {
                tracing::info!("Connecting to MongoDB...");
                let client = MongoClient::with_uri_str(&config.mongo_uri)
                    .await
                    .context("Failed to create MongoDB client")?;
                let store = MongoStore::new(client.database(&config.mongo_database));

                tokio::time::timeout(std::time::Duration::from_secs(5), store.ping())
                    .await
                    .map_err(|_| anyhow::anyhow!("MongoDB ping timeout after 5s"))??;
                store.ensure_indexes().await?;

                tracing::info!(database = %config.mongo_database, "MongoDB connection established");
                Arc::new(store)
            }
            StoreBackend::Memory => {
                let store = match &config.seed_path {
                    Some(path) => InMemoryStore::from_seed_file(path)?,
                    None => {
                        tracing::warn!("In-memory store started without SEED_PATH; no categories available");
                        InMemoryStore::new()
                    }
                };
                Arc::new(store)
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn GameStore>) -> Self {
        Self { config, store }
    }
}

pub mod answer_service;
pub mod category_service;
pub mod lifeline_service;
pub mod question_service;
pub mod reporting_service;
pub mod session_service;
