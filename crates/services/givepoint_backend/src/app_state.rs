// --- File: crates/services/givepoint_backend/src/app_state.rs ---
use std::sync::Arc;

use givepoint_common::services::ServiceFactory;
use givepoint_config::AppConfig;
use givepoint_db::DbClient;

/// Application state shared across all routes.
///
/// Holds the configuration, the database client, and the service factory the
/// feature routers pull their dependencies from.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db_client: Option<DbClient>,
    pub service_factory: Arc<dyn ServiceFactory>,
}

impl AppState {
    pub fn new(
        config: Arc<AppConfig>,
        db_client: Option<DbClient>,
        service_factory: Arc<dyn ServiceFactory>,
    ) -> Self {
        Self {
            config,
            db_client,
            service_factory,
        }
    }
}
