//! App Core for JGChat.
//!
//! Central struct holding the database and services, managing startup.
//! Configuration is loaded here and passed to each component as an
//! explicit snapshot, with no ambient global state.

use std::sync::Arc;

use crate::database::connection::Database;
use crate::services::chat_orchestrator::ChatOrchestrator;
use crate::services::model_catalog::{ModelCatalog, ModelCatalogTrait};
use crate::services::session_tokens::SessionTokens;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Central application struct holding the database and services.
///
/// The QuestionLog is created on-demand via `db.connection()` because it
/// borrows the connection with a lifetime parameter.
pub struct App {
    pub db: Arc<Database>,
    pub settings_engine: SettingsEngine,
    pub session_tokens: SessionTokens,
    pub model_catalog: ModelCatalog,
    pub chat: ChatOrchestrator,
}

impl App {
    /// Creates a new App against the default provider endpoint.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::build(db_path, None, None)
    }

    /// Creates a new App with config-path and provider-endpoint overrides.
    /// Used by tests to point at a temp config file and a stub server.
    pub fn with_overrides(
        db_path: &str,
        config_path: Option<String>,
        api_base: Option<&str>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::build(db_path, config_path, api_base)
    }

    fn build(
        db_path: &str,
        config_path: Option<String>,
        api_base: Option<&str>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);

        let mut settings_engine = SettingsEngine::new(config_path);
        if let Err(e) = settings_engine.load() {
            log::warn!("failed to load settings, continuing with defaults: {}", e);
        }

        let (model_catalog, chat) = match api_base {
            Some(base) => (
                ModelCatalog::with_api_base(base)
                    .map_err(|e| format!("ModelCatalog init failed: {}", e))?,
                ChatOrchestrator::with_api_base(base)
                    .map_err(|e| format!("ChatOrchestrator init failed: {}", e))?,
            ),
            None => (
                ModelCatalog::new().map_err(|e| format!("ModelCatalog init failed: {}", e))?,
                ChatOrchestrator::new()
                    .map_err(|e| format!("ChatOrchestrator init failed: {}", e))?,
            ),
        };

        Ok(Self {
            db,
            settings_engine,
            session_tokens: SessionTokens::new(),
            model_catalog,
            chat,
        })
    }

    /// Startup sequence: load settings, then best-effort catalog refresh.
    ///
    /// The refresh only runs when an API key is configured, and failures
    /// are suppressed since an unreachable provider must not block startup.
    pub fn startup(&mut self) {
        if let Err(e) = self.settings_engine.load() {
            log::warn!("failed to load settings, continuing with defaults: {}", e);
        }

        let api_key = self.settings_engine.get_settings().api.api_key.clone();
        if api_key.is_empty() {
            return;
        }

        match self.model_catalog.refresh(&api_key) {
            Ok(models) => {
                if let Err(e) = self.settings_engine.replace_models(models) {
                    log::warn!("failed to persist refreshed model catalog: {}", e);
                }
            }
            Err(e) => log::debug!("startup model refresh skipped: {}", e),
        }
    }
}
