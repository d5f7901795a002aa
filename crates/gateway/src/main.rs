//! Webstore Gateway - HTTP access to MongoDB collections.
//!
//! This binary serves the gateway on port 3000 (or `PORT`).
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - One shared MongoDB handle, connected before the listener binds
//! - Generic CRUD over any named collection, plus `/place-order`
//! - Append-only activity log (`project.log`) alongside `tracing` output
//!
//! # Startup
//!
//! A failed initial connection is fatal: the process logs it and exits
//! non-zero. There is no reconnect; an external supervisor restarts it.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webstore_gateway::activity::ActivityLog;
use webstore_gateway::config::GatewayConfig;
use webstore_gateway::db::MongoStore;
use webstore_gateway::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &GatewayConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from environment (needed for Sentry init)
    let config = GatewayConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "webstore_gateway=info,activity=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let (activity, writer) = ActivityLog::spawn_file_writer(&config.activity_log_path);

    let store = match MongoStore::connect(&config.database_url, &config.database_name).await {
        Ok(store) => {
            activity.log("Connected to MongoDB");
            store
        }
        Err(e) => {
            activity.log("Error connecting to MongoDB");
            tracing::error!(error = %e, "Failed to connect to MongoDB");
            // Let the writer drain so the failure reaches the log file
            drop(activity);
            let _ = writer.await;
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(Arc::new(store), activity.clone());

    // Build router
    let app = webstore_gateway::app(state, &config.static_dir)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("gateway listening on {}", addr);
    activity.log(format!("Server started on port {}", config.port));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // The router's state is gone; dropping the last handle ends the writer
    drop(activity);
    let _ = writer.await;

    ExitCode::SUCCESS
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
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
