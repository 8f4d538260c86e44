use anyhow::{Context, Result};
use axum::{Router, routing::get};
use order::{config::myconfig::Config, metrics::metrics_handler, state::AppState};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::{init_logger, shutdown_signal},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, state) = setup().await.context("Failed to setup application")?;

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metric_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics listener on {addr}"))?;

    info!("📈 Metrics server listening on http://{addr}/metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Metrics server failed")?;

    info!("✅ Order service shutdown complete.");
    Ok(())
}

async fn setup() -> Result<(Config, Arc<AppState>)> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    init_logger("order-service", config.is_dev, config.enable_file_log);

    let db_pool = ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("failed to migration database")?;
    }

    info!("📦 Stock policy: {}", config.stock_policy);

    let state = Arc::new(AppState::new(db_pool, &config).await);

    info!("✅ Application setup completed successfully.");
    Ok((config, state))
}

pub async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("✅ Migrations applied");

    Ok(())
}
