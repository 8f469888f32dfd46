use std::sync::Arc;

use bookshelf::config::{Cli, DbConfig, load_env_file};
use bookshelf::db::Database;
use bookshelf::handler::AppState;
use bookshelf::routes;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("bookshelf.svc starting");

    load_env_file(&args.env_file).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = %args.env_file, "failed to load env file");
        std::process::exit(1);
    });

    let cfg = DbConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to load database config");
        std::process::exit(1);
    });
    tracing::info!(config = ?cfg, "loaded database config");

    let db = Database::connect(&cfg).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup database");
        std::process::exit(1);
    });

    if let Err(e) = db.migrate().await {
        tracing::error!(error = %e, "failed to migrate database");
        std::process::exit(1);
    }

    let app = routes::app(AppState::new(Arc::new(db.clone())));

    let address = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("bookshelf.svc running on {}", &address);
    if let Err(err) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        tracing::error!(error = %err, "server stopped unexpectedly");
        std::process::exit(1);
    }

    db.close().await;
    tracing::info!("bookshelf.svc going off, graceful shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("ctrl+c signal received, preparing to shutdown"),
        _ = terminate => tracing::info!("terminate signal received, preparing to shutdown"),
    }
}
