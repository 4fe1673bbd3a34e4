// --- File: crates/services/givepoint_backend/src/main.rs ---
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use givepoint_common::services::ServiceFactory;
use givepoint_config::{ensure_dotenv_loaded, load_config};
use givepoint_db::DbClient;

mod app_state;
mod service_factory;

use app_state::AppState;
use service_factory::GivepointServiceFactory;

#[cfg(feature = "give")]
use givepoint_common::is_give_enabled;
#[cfg(feature = "give")]
use givepoint_db::{
    BankAccountRepository, ContributionRepository, FundRepository, PersonRepository,
    RepositoryFactory, SavedAccountRepository, SqlBankAccountRepository,
    SqlContributionRepository, SqlFundRepository, SqlPersonRepository, SqlRepositoryFactory,
    SqlSavedAccountRepository,
};
#[cfg(feature = "give")]
use givepoint_give::logic::GiveContext;
#[cfg(feature = "give")]
use givepoint_give::routes as give_routes;

#[axum::debug_handler]
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.db_client {
        Some(db_client) => {
            if db_client.is_healthy().await {
                (StatusCode::OK, Json(json!({"status": "ok", "database": "up"})))
            } else {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"status": "degraded", "database": "down"})),
                )
            }
        }
        None => (
            StatusCode::OK,
            Json(json!({"status": "ok", "database": "not configured"})),
        ),
    }
}

/// Builds the giving router, or `None` when the feature cannot run with the
/// current configuration. A misconfigured giving stack disables the routes
/// instead of taking the whole server down.
#[cfg(feature = "give")]
async fn build_give_router(
    config: &Arc<givepoint_config::AppConfig>,
    service_factory: &Arc<GivepointServiceFactory>,
    db_client: Option<&DbClient>,
) -> Option<Router> {
    if !is_give_enabled(config) {
        info!("Giving endpoints are disabled in configuration");
        return None;
    }
    let Some(db_client) = db_client else {
        warn!("Giving is enabled but no database is configured, skipping give routes");
        return None;
    };
    let Some(gateway) = service_factory.payment_gateway() else {
        warn!("Giving is enabled but no payment gateway is available, skipping give routes");
        return None;
    };

    let repo_factory = SqlRepositoryFactory::new();
    let persons: SqlPersonRepository = repo_factory.create_repository(db_client.clone());
    let funds: SqlFundRepository = repo_factory.create_repository(db_client.clone());
    let contributions: SqlContributionRepository = repo_factory.create_repository(db_client.clone());
    let saved_accounts: SqlSavedAccountRepository = repo_factory.create_repository(db_client.clone());
    let bank_accounts: SqlBankAccountRepository = repo_factory.create_repository(db_client.clone());

    // Schema setup is idempotent and runs on every boot.
    let schema_init = async {
        persons.init_schema().await?;
        funds.init_schema().await?;
        contributions.init_schema().await?;
        saved_accounts.init_schema().await?;
        bank_accounts.init_schema().await?;
        Ok::<(), givepoint_db::DbError>(())
    };
    if let Err(err) = schema_init.await {
        error!(error = %err, "Failed to initialize giving schema, skipping give routes");
        return None;
    }

    let context = GiveContext {
        config: config.clone(),
        gateway,
        persons: Arc::new(persons),
        funds: Arc::new(funds),
        contributions: Arc::new(contributions),
        saved_accounts: Arc::new(saved_accounts),
        bank_accounts: Arc::new(bank_accounts),
    };
    Some(give_routes::routes(config.clone(), context))
}

#[tokio::main]
async fn main() {
    ensure_dotenv_loaded();
    givepoint_common::logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));
    let service_factory = Arc::new(GivepointServiceFactory::new(config.clone()));

    let db_client = if config.database.is_some() {
        match DbClient::new(&config).await {
            Ok(client) => {
                info!(client = %client, "Connected to database");
                Some(client)
            }
            Err(err) => {
                error!(error = %err, "Failed to connect to database");
                None
            }
        }
    } else {
        None
    };

    #[cfg(feature = "give")]
    let give_router = build_give_router(&config, &service_factory, db_client.as_ref()).await;

    let app_state = Arc::new(AppState::new(
        config.clone(),
        db_client,
        service_factory.clone() as Arc<dyn ServiceFactory>,
    ));

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Givepoint API!" }))
        .route("/health", get(health))
        .with_state(app_state);

    let api_router = Router::new().nest("/api", {
        #[allow(unused_mut)] // the give feature needs it mutable
        let mut router = api_router;
        #[cfg(feature = "give")]
        {
            if let Some(give_router) = give_router {
                router = router.merge(give_router);
            }
        }
        router
    });

    #[allow(unused_mut)]
    let mut app = api_router;

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        #[cfg(feature = "give")]
        use givepoint_give::doc::GiveApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Givepoint API",
                version = "0.1.0",
                description = "Givepoint donation service API docs",
            ),
            components(),
            tags((name = "Givepoint", description = "Core service endpoints")),
            servers((url = "/api", description = "Main API prefix")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)] // the give feature needs it mutable
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "give")]
        openapi_doc.merge(GiveApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
