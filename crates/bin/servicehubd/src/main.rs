//! # servicehubd: servicehub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use servicehub_adapter_http_axum::router;
use servicehub_adapter_http_axum::state::AppState;
use servicehub_adapter_storage_sqlite_sqlx::{
    SqliteDeviceRepository, SqliteDeviceTemplateRepository, SqliteServiceRepository,
    SqliteTokenStore,
};
use servicehub_app::property_bus::InProcessPropertyBus;
use servicehub_app::role_authorizer::RoleAuthorizer;
use servicehub_app::services::link_cleanup::LinkCleanup;
use servicehub_app::services::linked_device_service::LinkedDeviceService;
use servicehub_app::services::service_manager::ServiceManager;
use servicehub_domain::event::PropertiesUpdated;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging.filter);

    // Database
    let db = servicehub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to initialise database")?;
    let pool = db.pool().clone();

    // Repositories
    let service_repo = SqliteServiceRepository::new(pool.clone());
    let device_repo = Arc::new(SqliteDeviceRepository::new(pool.clone()));
    let template_repo = SqliteDeviceTemplateRepository::new(pool.clone());
    let token_store = SqliteTokenStore::new(pool);

    // Property bus
    let property_bus = Arc::new(InProcessPropertyBus::new(config.pubsub.capacity));
    spawn_property_log(property_bus.subscribe());

    // Services
    let cleanup = LinkCleanup::new(Arc::clone(&device_repo), template_repo, token_store);
    let service_manager = ServiceManager::new(service_repo, property_bus, cleanup);
    let linked_devices = LinkedDeviceService::new(
        device_repo,
        RoleAuthorizer::new(config.auth.privileged_roles.clone()),
    );

    // HTTP
    let app = router::build(AppState::new(service_manager, linked_devices));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "servicehubd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("servicehubd stopped");
    Ok(())
}

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), falling back to info");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Log every property update published on the bus.
fn spawn_property_log(mut receiver: broadcast::Receiver<PropertiesUpdated>) {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => tracing::info!(
                    topic = %event.topic(),
                    properties = event.properties.len(),
                    "service properties updated"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "property log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Resolve on SIGINT, or on SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
