//! Gatekey API server
//!
//! Wires the MySQL repository, Redis-backed job queue, SMTP worker pool,
//! and the authentication service into the Actix application and runs it
//! until shutdown.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gk_api::app::create_app;
use gk_api::state::AppState;
use gk_core::queue::{JobQueue, RetryPolicy, WorkerPool};
use gk_core::services::{
    AuthService, AuthServiceConfig, EmailDeliveryHandler, Mailer, TokenService, EMAIL_QUEUE,
};
use gk_infra::{
    DatabasePool, MySqlAccountRepository, RedisCacheInvalidator, RedisClient, RedisJobQueue,
    SmtpMailSender,
};
use gk_shared::config::{AppConfig, CacheConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env();
    info!("Starting Gatekey API server in {} mode", config.environment);

    if config.environment.is_production() && config.auth.jwt.is_using_default_secret() {
        warn!("JWT secrets are built-in defaults; set JWT_ACCESS_SECRET and JWT_REFRESH_SECRET");
    }

    let database = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to MySQL")?;
    database
        .run_migrations()
        .await
        .context("failed to run database migrations")?;
    database
        .health_check()
        .await
        .context("database health check failed")?;

    // Cache connection, used for account view invalidation
    let cache_client = RedisClient::new(config.cache.clone())
        .await
        .context("failed to connect to Redis cache")?;
    cache_client
        .health_check()
        .await
        .context("Redis health check failed")?;

    // The queue broker gets its own connection; queue keys are unprefixed
    let queue_client = RedisClient::new(CacheConfig::new(config.queue.url.clone()))
        .await
        .context("failed to connect to Redis queue")?;
    let job_queue: Arc<dyn JobQueue> = Arc::new(RedisJobQueue::new(queue_client));

    let sender =
        Arc::new(SmtpMailSender::new(&config.email).context("invalid SMTP configuration")?);
    let retry_policy = RetryPolicy::new(config.queue.max_attempts, &config.queue.backoff_ms);
    let reserve_timeout = Duration::from_secs(config.queue.reserve_timeout);
    let mut workers = WorkerPool::new(Arc::clone(&job_queue), retry_policy, reserve_timeout);
    workers.register(
        EMAIL_QUEUE,
        config.queue.concurrency_for(EMAIL_QUEUE),
        Arc::new(EmailDeliveryHandler::new(sender)),
    );
    workers.start();

    let repository = Arc::new(MySqlAccountRepository::new(database.get_pool().clone()));
    let token_service = Arc::new(TokenService::new(config.auth.jwt.clone()));
    let mailer = Arc::new(Mailer::new(
        Arc::clone(&job_queue),
        config.auth.verification.public_base_url.clone(),
    ));
    let auth_service = AuthService::new(
        repository,
        token_service,
        mailer,
        AuthServiceConfig::from(&config.auth),
    )
    .with_cache_invalidator(Arc::new(RedisCacheInvalidator::new(cache_client)));

    let state = web::Data::new(AppState::new(Arc::new(auth_service), config.environment));

    let bind_address = config.server.bind_address();
    info!("Listening on {}", bind_address);

    let app_config = config.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config))
        .keep_alive(Duration::from_secs(config.server.keep_alive))
        .shutdown_timeout(config.server.shutdown_timeout);

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("server error")?;

    // Drain in-flight email jobs before exiting
    workers.shutdown().await;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
