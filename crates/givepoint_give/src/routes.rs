// --- File: crates/givepoint_give/src/routes.rs ---
use std::sync::Arc;

use axum::routing::post;
use axum::Router;

use givepoint_config::AppConfig;

use crate::handlers::{give_handler, GiveState};
use crate::logic::GiveContext;

/// Creates a router for the giving endpoints.
pub fn routes(config: Arc<AppConfig>, context: GiveContext) -> Router {
    let state = Arc::new(GiveState { config, context });

    Router::new()
        .route("/give", post(give_handler))
        .with_state(state)
}
