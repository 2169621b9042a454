use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_report_api::{
    analysis::HttpCompanyAnalyzer, config::Config, db::PgStore, routes::create_router,
    storage::ReportStorage, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_report_api=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Connect to database
    let pool = agent_report_api::db::create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Database migrations completed");

    let analyzer = HttpCompanyAnalyzer::new(&config.analysis)?;
    info!(
        service = %config.analysis.service_url,
        timeout_secs = config.analysis.timeout_secs,
        "Analysis client ready"
    );

    // Create shared state
    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        analyzer: Arc::new(analyzer),
        reports: ReportStorage::new(config.storage.report_dir.clone()),
        config: config.clone(),
    };

    let app = create_router(state);

    // Start server
    let ip = config
        .server
        .host
        .parse::<std::net::IpAddr>()
        .context("HOST must be an IP address")?;
    let addr = SocketAddr::from((ip, config.server.port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
