use std::sync::Arc;

use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use studydrive_gateway::{api, GatewayConfig};
use studydrive_store::HttpObjectStore;
use studydrive_tree::TreeService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging (tracing)
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    // Missing credentials or root id is fatal: refuse to start serving
    // rather than fail per-request.
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };
    info!(
        api_base = %config.api_base,
        root = %config.root_folder_id,
        "configuration loaded"
    );

    let store = Arc::new(HttpObjectStore::new(
        config.api_base.clone(),
        config.account_id.clone(),
        config.account_key.clone(),
    ));
    let tree = Arc::new(TreeService::new(store, config.root_folder_id.clone()));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(api::AppState { tree }).layer(cors);

    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("gateway listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
