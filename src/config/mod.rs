/// Database configuration and connection management
pub mod database;

/// Default account type seeding from config.toml
pub mod account_types;

/// HTTP server settings from environment variables
pub mod server;
