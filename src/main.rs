use std::net::SocketAddr;

use anyhow::Result;
use gym_manager::api::{create_routes, AppState};
use gym_manager::config::{AppConfig, DatabaseSeeder};
use gym_manager::store::Database;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gym_manager={0},tower_http={0}", config.log_level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let db = Database::empty().shared();
    if config.seed_demo_data {
        DatabaseSeeder::new(db.clone(), config.bcrypt_cost)
            .seed_all()
            .await?;
    }

    let app = create_routes(AppState::new(db, &config));

    let listener = TcpListener::bind(config.server_address()).await?;
    info!(
        environment = %config.environment,
        trust_proxy = config.trust_proxy,
        "Gym manager server starting on http://{}",
        config.server_address()
    );
    info!("Health check available at http://{}/health", config.server_address());
    info!("GraphQL playground available at http://{}/graphql", config.server_address());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
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
