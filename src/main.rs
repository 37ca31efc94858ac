use budget_book::{
    api::{self, AppState},
    config::{account_types, database, server::ServerConfig},
    core::account_type::seed_account_types,
    errors::Result,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    let server_config = ServerConfig::from_env()?;

    // 3. Connect and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed default account types, if a config file is present
    let config_path = account_types::config_path();
    match account_types::load_optional_config(&config_path)? {
        Some(config) => {
            let created = seed_account_types(&db, &config.account_types)
                .await
                .inspect_err(|e| error!("Failed to seed account types: {}", e))?;
            info!("Seeded {} account type(s) from {}", created, config_path);
        }
        None => info!("No config file at {}, skipping account type seeding.", config_path),
    }

    // 5. Serve
    let address = server_config.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", address, e))?;
    info!("Budget book listening on http://{}", address);

    axum::serve(listener, api::router(AppState { db: Arc::new(db) })).await?;

    Ok(())
}
