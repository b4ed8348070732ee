//! Application state wiring the relay together.
//!
//! The relay service is generic over the repository and completion-client
//! seams; `AppState` pins it to the concrete infra implementations and is
//! shared by both the console and HTTP transports.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use courier_core::relay::RelayService;
use courier_infra::config::{load_config, resolve_data_dir};
use courier_infra::llm::OpenAiCompletionClient;
use courier_infra::sqlite::{DatabasePool, SqliteUserRepository};

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteRelayService = RelayService<SqliteUserRepository, OpenAiCompletionClient>;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ConcreteRelayService>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to the DB,
    /// wire the relay service.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("courier.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let repo = SqliteUserRepository::new(db_pool.clone());
        let client = OpenAiCompletionClient::new(
            config.base_url.clone(),
            Duration::from_secs(config.completion_timeout_secs),
        );
        let relay = RelayService::new(repo, client, config);

        Ok(Self {
            relay: Arc::new(relay),
            data_dir,
            db_pool,
        })
    }
}
