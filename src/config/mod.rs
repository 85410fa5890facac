//! Configuration management for `HabitForge`.

/// Database configuration and connection management
pub mod database;

/// Seed habit loading from config.toml
pub mod habits;
