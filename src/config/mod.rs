/// Database configuration and connection management
pub mod database;

/// Application settings loaded from a TOML file
pub mod settings;
