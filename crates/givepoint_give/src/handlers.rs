// --- File: crates/givepoint_give/src/handlers.rs ---
use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use givepoint_common::HttpStatusCode;
use givepoint_config::AppConfig;

use crate::error::GiveError;
use crate::logic::{process_give, GiveContext};
use crate::models::GiveRequest;

// --- State ---

#[derive(Clone)]
pub struct GiveState {
    pub config: Arc<AppConfig>,
    pub context: GiveContext,
}

// --- Handlers ---

/// Accepts a gift. Returns `204 No Content` on success; validation problems
/// come back as `400` with a plain-text reason, gateway failures as `500`
/// with the gateway's own message, and a gateway timeout as `504`.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/give",
    request_body = GiveRequest,
    responses(
        (status = 204, description = "Gift accepted and charged"),
        (status = 400, description = "Validation failure", body = String),
        (status = 500, description = "Gateway or internal failure", body = String),
        (status = 503, description = "Giving feature disabled"),
        (status = 504, description = "Gateway timeout", body = String),
    ),
    tag = "Giving"
))]
#[axum::debug_handler]
pub async fn give_handler(
    State(state): State<Arc<GiveState>>,
    Json(payload): Json<GiveRequest>,
) -> Response {
    if !state.config.use_give {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            "Giving endpoint is not enabled".to_string(),
        )
            .into_response();
    }

    match process_give(&state.context, payload).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let status = StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                error!(error = %err, status = status.as_u16(), "give request failed");
            } else {
                debug!(error = %err, status = status.as_u16(), "give request rejected");
            }
            // Storage details stay in the logs; the client gets a stable
            // message for anything that is not the gateway's own wording.
            let body = match &err {
                GiveError::Db(_) | GiveError::Internal(_) => {
                    "An internal error occurred while processing the gift".to_string()
                }
                other => other.to_string(),
            };
            (status, body).into_response()
        }
    }
}
