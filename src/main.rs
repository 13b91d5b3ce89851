//! DocVault server entry point.
//!
//! Wires the capability crates together: database, cache, payload
//! storage, services, change broadcaster, and the background worker with
//! its cron scheduler. The HTTP surface is intentionally absent; an
//! embedding transport consumes the service layer directly.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use docvault_auth::{PasswordHasher, PasswordValidator, RbacEnforcer};
use docvault_cache::CacheManager;
use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::traits::cache::CacheProvider;
use docvault_database::connection::DatabasePool;
use docvault_database::repositories::{
    AuditLogRepository, DocumentRepository, JobRepository, UserRepository,
};
use docvault_realtime::ChangeBroadcaster;
use docvault_service::{AuditService, DocumentService, UserService};
use docvault_storage::StorageManager;
use docvault_worker::jobs::{CleanupJobHandler, PostProcessJobHandler};
use docvault_worker::{CronScheduler, JobExecutor, PgJobQueue, WorkerRunner};

#[tokio::main]
async fn main() {
    let env = std::env::var("DOCVAULT_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocVault v{}", env!("CARGO_PKG_VERSION"));

    if config.storage.provider == "local" {
        tokio::fs::create_dir_all(&config.storage.local.root_path)
            .await
            .map_err(|e| {
                AppError::internal(format!(
                    "Failed to create storage root '{}': {e}",
                    config.storage.local.root_path
                ))
            })?;
    }

    // Database connection + migrations.
    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database).await?;
    docvault_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    // Cache and payload storage.
    tracing::info!(provider = %config.cache.provider, "Initializing cache...");
    let cache = CacheManager::new(&config.cache).await?;
    if !cache.health_check().await? {
        return Err(AppError::internal("Cache backend failed its health check"));
    }

    tracing::info!(provider = %config.storage.provider, "Initializing payload storage...");
    let storage = Arc::new(StorageManager::new(&config.storage).await?);

    // Repositories.
    let user_repo = Arc::new(UserRepository::new(db.pool().clone()));
    let document_repo = Arc::new(DocumentRepository::new(db.pool().clone()));
    let audit_repo = Arc::new(AuditLogRepository::new(db.pool().clone()));
    let job_repo = Arc::new(JobRepository::new(db.pool().clone()));

    // Access control and credentials.
    let rbac = Arc::new(RbacEnforcer::new());
    let hasher = PasswordHasher::new();
    let validator = PasswordValidator::new(&config.auth);

    // Job queue and change broadcaster.
    let worker_id = format!("worker-{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let job_queue = Arc::new(PgJobQueue::new(Arc::clone(&job_repo), worker_id.clone()));
    let broadcaster = Arc::new(ChangeBroadcaster::new(&config.realtime));

    // Service layer, ready for an embedding transport.
    let document_service = Arc::new(DocumentService::new(
        document_repo.clone(),
        audit_repo.clone(),
        storage.clone(),
        cache.clone(),
        Arc::clone(&rbac),
        job_queue.clone(),
        broadcaster.clone(),
        &config,
    ));
    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        hasher,
        validator,
        Arc::clone(&rbac),
    ));
    let audit_service = Arc::new(AuditService::new(audit_repo.clone(), Arc::clone(&rbac)));
    tracing::info!("Service layer initialized");

    // Log change events so single-node deployments get a visible trail
    // even before any realtime subscriber connects.
    let mut changes = broadcaster.subscribe();
    tokio::spawn(async move {
        while let Ok(message) = changes.recv().await {
            tracing::debug!(
                action = message.event.action(),
                document_id = %message.event.document().id,
                "Change event"
            );
        }
    });

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Background worker and cron scheduler.
    let (worker_handle, mut scheduler) = if config.worker.enabled {
        tracing::info!(worker_id = %worker_id, "Starting background worker...");

        let mut executor = JobExecutor::new();
        executor.register(Arc::new(PostProcessJobHandler::new(
            document_repo.clone(),
        )));
        executor.register(Arc::new(CleanupJobHandler::new(
            document_repo.clone(),
            storage.clone(),
        )));

        let runner = WorkerRunner::new(
            Arc::clone(&job_queue),
            Arc::new(executor),
            config.worker.clone(),
            worker_id,
        );

        let scheduler = CronScheduler::new(Arc::clone(&job_queue)).await?;
        scheduler.register_tasks(&config.worker).await?;
        scheduler.start().await?;

        let cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            runner.run(cancel).await;
        });

        (Some(handle), Some(scheduler))
    } else {
        tracing::info!("Background worker disabled");
        (None, None)
    };

    tracing::info!("DocVault is ready");

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
    let _ = shutdown_tx.send(true);

    if let Some(mut s) = scheduler.take() {
        s.shutdown().await?;
    }
    if let Some(handle) = worker_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(30), handle).await;
    }

    drop((document_service, user_service, audit_service));
    db.close().await;
    tracing::info!("DocVault shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
