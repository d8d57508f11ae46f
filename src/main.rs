mod adapters;
mod application;
mod config;
mod domain;
mod error;
mod interface;
mod ports;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::{DockerAdapter, ProcessComposeRunner};
use application::{DockerProxy, StackExecutor, StackScanner};
use config::Config;
use interface::http::create_router;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("dockge_proxy={},tower_http=info", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dockge-proxy v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    // Initialize adapters
    let engine = DockerAdapter::with_socket(config.docker_socket.clone());
    info!("✓ Docker engine socket: {}", engine.socket_path().display());

    let (program, base_args) = config.compose_program();
    let runner = ProcessComposeRunner::new(program, base_args);

    let scanner = StackScanner::new(config.stacks_dir.clone());
    info!("✓ Stacks directory: {}", scanner.root().display());

    let proxy = Arc::new(DockerProxy::new(
        Arc::new(engine),
        scanner,
        StackExecutor::new(config.stacks_dir.clone(), Arc::new(runner)),
    ));

    // Create HTTP server
    let app = create_router(proxy, config.static_dir.as_deref());
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✓ dockge-proxy listening on {}", addr);
    info!("  → API: http://localhost:{}/api/docker/", config.port);
    if let Some(dir) = &config.static_dir {
        info!("  → Dashboard: http://localhost:{} (from {})", config.port, dir.display());
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("dockge-proxy stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
