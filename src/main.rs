use commission_engine::{api, config::Config, db::init_db, CommissionEngine, RateRegistry, Repository};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let registry = match RateRegistry::load(&config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to load rate tables: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        insurers = registry.list_active_configs().count(),
        salesperson_overrides = registry.list_salesperson_overrides().count(),
        "Rate registry loaded"
    );

    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let engine = CommissionEngine::new(Arc::new(registry));
    let store = Arc::new(Repository::new(pool));
    let app = api::create_router(api::AppState::new(engine, store));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
