use std::sync::Arc;
use std::time::Duration;

use axum_helpers::JwtAuth;
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_notifications::OnlineRegistry;
use domain_notifications::email::SmtpProvider;
use domain_tasks::{DeleteImageHandler, MongoTaskStore, TaskWorker, VerificationEmailHandler};
use domain_users::MongoUserRepository;
use tracing::info;

mod adapters;
mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.url);

    // Connect to MongoDB with retry
    let db =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, Default::default())
            .await?;

    info!("Successfully connected to MongoDB database: {}", db.name());

    // Unique indexes must exist before the first signup
    MongoUserRepository::ensure_indexes(&db).await?;

    let tasks = Arc::new(MongoTaskStore::new(&db));

    // Background worker for email and asset-deletion tasks
    let smtp = SmtpProvider::new(config.smtp.clone())?;
    let worker = TaskWorker::new(Arc::clone(&tasks))
        .register(Arc::new(VerificationEmailHandler::new(
            smtp,
            config.base_url.clone(),
        )))
        .register(Arc::new(DeleteImageHandler::new(config.assets.clone())));
    let worker_handle = worker.spawn();

    // Initialize the application state
    let state = AppState {
        jwt: JwtAuth::new(&config.jwt),
        config,
        db,
        registry: OnlineRegistry::new(),
        tasks,
    };

    // Build router with API routes
    let api_routes = api::routes(&state);

    // Create a router with OpenAPI docs
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    // Merge health endpoints
    let app = router.merge(health_router(state.config.app));

    info!("Starting Bazaar API with production-ready shutdown (30s timeout)");

    // Production-ready server with graceful shutdown
    create_production_app(app, &state.config.server, Duration::from_secs(30), async move {
        info!("Shutting down: stopping background task worker");
        worker_handle.abort();
        info!("Background task worker stopped");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Bazaar API shutdown complete");
    Ok(())
}
