//! Application state wiring the hub to its SQLite store.
//!
//! `Hub` is generic over the store traits; AppState pins it to the concrete
//! infra implementations. Used by both the CLI and the HTTP handlers.

use std::sync::Arc;

use anyhow::Context;
use chathub_core::hub::Hub;
use chathub_infra::sqlite::config::SqliteConfigStore;
use chathub_infra::sqlite::memory::SqliteMemoryStore;
use chathub_infra::sqlite::message::SqliteMessageStore;
use chathub_infra::sqlite::pool::DatabasePool;
use chathub_infra::sqlite_session_store;
use chathub_types::config::HubConfig;
use tracing::info;

pub type ConcreteHub = Hub<SqliteMessageStore, SqliteMemoryStore, SqliteConfigStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<ConcreteHub>,
    pub config: Arc<HubConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Create the data directory, open the database, and build the hub.
    pub async fn init(config: HubConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", config.data_dir.display()))?;

        let db_pool = DatabasePool::new(&config.database_url())
            .await
            .with_context(|| format!("failed to open database {}", config.database_path().display()))?;

        Ok(Self::from_pool(config, db_pool))
    }

    /// Build state over an already opened pool.
    pub fn from_pool(config: HubConfig, db_pool: DatabasePool) -> Self {
        let store = Arc::new(sqlite_session_store(&db_pool));
        Self {
            hub: Arc::new(Hub::new(store)),
            config: Arc::new(config),
            db_pool,
        }
    }

    /// Register a placeholder handler for every bot id listed in the config.
    ///
    /// A duplicate id in the list is a startup fault.
    pub fn register_configured_bots(&self) -> anyhow::Result<()> {
        for bot_id in &self.config.bots {
            self.hub
                .register_placeholder(
                    bot_id.as_str(),
                    self.config.placeholder_reply.as_str(),
                    self.config.persist_replies,
                )
                .with_context(|| format!("failed to register bot '{bot_id}'"))?;
            info!(%bot_id, "bot registered");
        }
        Ok(())
    }
}
