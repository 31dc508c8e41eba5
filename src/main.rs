//! ragnet server entrypoint.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use ragnet::adapters::chat::{ConnectionManager, DiscordGateway, MentionHandler};
use ragnet::adapters::engine::HttpReasoningEngine;
use ragnet::adapters::http::{app_router, AppState};
use ragnet::adapters::postgres::{
    PostgresApiKeyRepository, PostgresConversationRepository, PostgresOrganizationRepository,
    PostgresPolicyRepository, PostgresSourceRepository, PostgresUserRepository,
};
use ragnet::application::{
    IdentityService, InsightsService, OrganizationService, QueryPipeline, SourceService,
};
use ragnet::config::AppConfig;
use ragnet::domain::foundation::OrgId;
use ragnet::ports::ReasoningEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .with_target(true)
        .init();

    let pool = connect_database(&config).await?;

    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let organizations = Arc::new(PostgresOrganizationRepository::new(pool.clone()));
    let sources = Arc::new(PostgresSourceRepository::new(pool.clone()));
    let conversations = Arc::new(PostgresConversationRepository::new(pool.clone()));
    let policies = Arc::new(PostgresPolicyRepository::new(pool.clone()));
    let api_keys = Arc::new(PostgresApiKeyRepository::new(pool.clone()));

    let engine: Arc<dyn ReasoningEngine> =
        Arc::new(HttpReasoningEngine::new(config.engine.clone())?);

    let identity = Arc::new(IdentityService::new(
        users,
        organizations.clone(),
        api_keys,
        config.auth.clone(),
    ));
    let organization_service = Arc::new(OrganizationService::new(
        organizations.clone(),
        engine.clone(),
    ));
    let source_service = Arc::new(SourceService::new(sources, engine.clone()));
    let pipeline = Arc::new(QueryPipeline::new(
        identity.clone(),
        organizations.clone(),
        conversations.clone(),
        policies.clone(),
        engine.clone(),
    ));
    let insights = Arc::new(InsightsService::new(conversations.clone(), engine));

    let state = AppState {
        identity,
        organizations: organization_service.clone(),
        sources: source_service,
        pipeline: pipeline.clone(),
        insights,
        policies,
        conversations,
    };

    let _chat = start_chat(&config, organization_service, pipeline).await?;

    let app = app_router(state, &config.server);
    let addr = config.server.socket_addr();
    tracing::info!(%addr, environment = ?config.server.environment, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn connect_database(config: &AppConfig) -> Result<PgPool, Box<dyn std::error::Error>> {
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }
    Ok(pool)
}

/// Brings up the chat-bot channel when enabled. The returned manager
/// keeps the connection alive for the life of the process.
async fn start_chat(
    config: &AppConfig,
    organizations: Arc<OrganizationService>,
    pipeline: Arc<QueryPipeline>,
) -> Result<Option<ConnectionManager>, Box<dyn std::error::Error>> {
    if !config.chat.enabled {
        return Ok(None);
    }
    let org_id = config
        .chat
        .org_id
        .map(OrgId::from_uuid)
        .ok_or("chat channel enabled without an organization")?;
    let organization = organizations.get(&org_id).await?;

    let gateway = Arc::new(DiscordGateway::from_config(&config.chat)?);
    let handler = Arc::new(MentionHandler::new(
        gateway,
        pipeline,
        org_id,
        &organization.name,
    ));

    let manager = ConnectionManager::new();
    manager.swap(handler).await;
    tracing::info!(org = %organization.name, "chat channel connected");
    Ok(Some(manager))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!("failed to install SIGTERM handler: {}", err),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
