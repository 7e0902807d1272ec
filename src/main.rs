//! cluster-demo server binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use cluster_demo::adapters::http::{app_router, ControlAppState};
use cluster_demo::adapters::{
    Hub, InMemoryRecordStore, PostgresNodeStatusSource, PostgresRecordStore,
    RemoteNodeStatusSource, RemoteStatusConfig,
};
use cluster_demo::application::{HealthMonitor, StartOutcome, WorkloadGenerator};
use cluster_demo::config::{AppConfig, DatabaseConfig, HealthConfig, HealthMode};
use cluster_demo::ports::{NodeStatusSource, RecordStore};
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.validate().context("Invalid configuration")?;

    let pool = match config.database.url() {
        Some(url) => Some(connect(url, &config.database).await?),
        None => {
            tracing::warn!("No database configured, keeping records in memory");
            None
        }
    };

    let store: Arc<dyn RecordStore> = match &pool {
        Some(pool) => {
            let store = PostgresRecordStore::new(pool.clone());
            if config.database.run_migrations {
                store.ensure_schema().await.context("Failed to prepare schema")?;
            }
            Arc::new(store)
        }
        None => Arc::new(InMemoryRecordStore::new()),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (hub, hub_task) = Hub::spawn(config.hub.hub_config(), shutdown_rx.clone());

    let source = node_source(&config.health, pool.as_ref())?;
    let monitor = HealthMonitor::new(source, config.health.poll_interval())
        .with_publisher(Arc::new(hub.clone()));
    let health = monitor.handle();
    let monitor_task = tokio::spawn(monitor.run(shutdown_rx));

    let generator = Arc::new(WorkloadGenerator::new(
        config.workload.settings(),
        store,
        Arc::new(hub.clone()),
    ));
    if config.workload.autostart {
        if let StartOutcome::Started(run_id) = generator.start() {
            tracing::info!(run_id = %run_id, "Generator started at boot");
        }
    }

    let app = app_router(
        ControlAppState {
            generator: generator.clone(),
            health,
            hub,
            redirect_url: config.server.redirect_url.clone(),
        },
        &config.server.static_dir,
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!(%addr, static_dir = %config.server.static_dir, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("Server error")?;

    generator.shutdown().await;
    let _ = monitor_task.await;
    let _ = hub_task.await;

    tracing::info!("Shut down");
    Ok(())
}

async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect(url)
        .await
        .context("Failed to connect to the database")?;

    tracing::info!(max_connections = config.max_connections, "Connected to database");
    Ok(pool)
}

fn node_source(config: &HealthConfig, pool: Option<&PgPool>) -> Result<Arc<dyn NodeStatusSource>> {
    match config.mode {
        HealthMode::Local => {
            let pool = pool.context("Local health mode needs a database")?;
            Ok(Arc::new(PostgresNodeStatusSource::new(pool.clone())))
        }
        HealthMode::Remote => {
            let url = config
                .nodes_info_url
                .clone()
                .context("Remote health mode needs a nodes info URL")?;
            let mut remote = RemoteStatusConfig::new(url).with_timeout(config.request_timeout());
            if let Some(token) = &config.bearer_token {
                remote = remote.with_bearer_token(token.expose_secret().clone());
            }
            let source =
                RemoteNodeStatusSource::new(remote).context("Failed to build HTTP client")?;
            Ok(Arc::new(source))
        }
    }
}

/// Resolves on Ctrl-C or SIGTERM after telling background tasks to stop.
async fn shutdown_signal(shutdown: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    let _ = shutdown.send(true);
}
