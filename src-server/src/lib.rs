//! Kanban Board Backend
//!
//! Layered architecture:
//! - domain: Core entities, positions and business rules
//! - repository: Data access abstractions and the SQLite implementation
//! - engine: Reorders and cross-column moves over an ordering store
//! - commands: One handler per user action

use std::path::Path;
use std::sync::Arc;

pub mod ai;
pub mod commands;
pub mod config;
pub mod domain;
pub mod engine;
pub mod repository;
pub mod revalidate;

use ai::AiClient;
use config::AppConfig;
use domain::{DomainError, DomainResult};
use engine::ReorderEngine;
use repository::{init_db, BoardRepository, CardRepository, ColumnRepository, DbState, SqliteOrderingStore};
use revalidate::Revalidator;

const LOG_APP_NAME: &str = "kanban";

/// Application state shared across commands
pub struct AppState {
    pub config: AppConfig,
    pub db_state: DbState,
    pub boards: BoardRepository,
    pub columns: ColumnRepository,
    pub cards: CardRepository,
    pub engine: ReorderEngine<SqliteOrderingStore>,
    /// None when no API key is configured
    pub ai: Option<AiClient>,
    pub revalidator: Revalidator,
}

impl AppState {
    /// Set up logging, open the database and build the AI client
    pub async fn init(config: AppConfig) -> DomainResult<Self> {
        if let Some(log_dir) = &config.log_dir {
            init_logging(log_dir)?;
        }

        let db_state = init_db(&config.db_path).await?;
        let conn = db_state.conn.clone();

        let ai = match AiClient::new(
            config.openai_api_key.clone(),
            config.ai_base_url.clone(),
            config.ai_model.clone(),
        ) {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("AI assist disabled: {}", e);
                None
            }
        };

        Ok(Self {
            boards: BoardRepository::new(conn.clone()),
            columns: ColumnRepository::new(conn.clone()),
            cards: CardRepository::new(conn.clone()),
            engine: ReorderEngine::new(Arc::new(SqliteOrderingStore::new(conn))),
            ai,
            revalidator: Revalidator::new(),
            db_state,
            config,
        })
    }

    /// Close the database connection
    pub async fn shutdown(&self) {
        self.db_state.close().await;
        log::info!("Kanban backend stopped");
        if self.config.log_dir.is_some() {
            rolling_logger::flush();
        }
    }
}

fn init_logging(log_dir: &Path) -> DomainResult<()> {
    match rolling_logger::init_logger(log_dir, LOG_APP_NAME) {
        Ok(()) => {
            log::info!("Logging to {}", log_dir.display());
            Ok(())
        }
        // A second AppState in the same process keeps the first logger
        Err(rolling_logger::LoggerError::AlreadyInitialized) => Ok(()),
        Err(e) => Err(DomainError::Configuration(format!("Failed to init logger: {}", e))),
    }
}
