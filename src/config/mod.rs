/// Database configuration and connection management
pub mod database;

/// Catalog seed loading from config.toml
pub mod catalog;

/// Application settings from environment variables
pub mod settings;
