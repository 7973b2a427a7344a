//! Gatherly Request Service
//!
//! Main application entry point

use std::sync::Arc;

use tracing::info;

use gatherly_requests::{
    clients::{ChatServiceClient, EventServiceClient, RatingServiceClient, UserServiceClient},
    config::Settings,
    database::{connection, RequestRepository},
    services::{RedisEventPublisher, RequestService, Scheduler},
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", gatherly_requests::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..Default::default()
    };
    let pool = connection::create_pool(&db_config).await?;
    connection::run_migrations(&pool).await?;

    // Initialize the Redis notification bus
    info!("Connecting to Redis...");
    let redis_client = redis::Client::open(settings.redis.url.clone())?;
    let publisher = RedisEventPublisher::new(redis_client, settings.redis.channel_prefix.clone());

    // Collaborator service clients
    let timeout = settings.services.timeout_seconds;
    let events = EventServiceClient::new(settings.services.event_service_url.clone(), timeout)?;
    let identity = UserServiceClient::new(settings.services.user_service_url.clone(), timeout)?;
    let trust = RatingServiceClient::new(settings.services.rating_service_url.clone(), timeout)?;
    let chat = ChatServiceClient::new(settings.services.chat_service_url.clone(), timeout)?;

    let store = RequestRepository::new(pool);

    let service = Arc::new(RequestService::new(
        Arc::new(store),
        Arc::new(events),
        Arc::new(identity),
        Arc::new(trust),
        Arc::new(chat),
        Arc::new(publisher),
        settings.request.clone(),
    ));

    // Background expiration sweep and retention purge
    let scheduler = Scheduler::new(Arc::clone(&service), settings.scheduler.clone());
    let tasks = scheduler.start();

    info!("Gatherly request service is ready");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping background tasks");

    for task in tasks {
        task.abort();
    }

    info!("Gatherly request service has been shut down");
    Ok(())
}
