//! Custom error types for Ferrotune.
//!
//! This module provides a centralized error handling system with specific error types
//! for different parts of the application.

use std::fmt;

/// Main error type for Ferrotune operations.
#[derive(Debug)]
pub enum FerrotuneError {
    /// Configuration errors (missing env vars, invalid values)
    Config(String),
    /// Database operation errors
    Database(String),
    /// Discord client errors
    Discord(String),
    /// Audio backend (Lavalink) errors
    Audio(String),
    /// Network/HTTP errors
    Network(String),
    /// Locale table errors
    Locale(String),
    /// Command/event registry errors
    Registry(String),
    /// Generic I/O errors
    Io(std::io::Error),
}

impl fmt::Display for FerrotuneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::Discord(msg) => write!(f, "Discord error: {}", msg),
            Self::Audio(msg) => write!(f, "Audio backend error: {}", msg),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Locale(msg) => write!(f, "Locale error: {}", msg),
            Self::Registry(msg) => write!(f, "Registry error: {}", msg),
            Self::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for FerrotuneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FerrotuneError::Io(err) => Some(err),
            _ => None,
        }
    }
}

// Implement From traits for automatic error conversion
impl From<std::io::Error> for FerrotuneError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<rusqlite::Error> for FerrotuneError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<sqlx::Error> for FerrotuneError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<poise::serenity_prelude::Error> for FerrotuneError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        Self::Discord(err.to_string())
    }
}

impl From<lavalink_rs::error::LavalinkError> for FerrotuneError {
    fn from(err: lavalink_rs::error::LavalinkError) -> Self {
        Self::Audio(err.to_string())
    }
}

impl From<reqwest::Error> for FerrotuneError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FerrotuneError {
    fn from(err: serde_json::Error) -> Self {
        Self::Locale(format!("JSON parsing error: {}", err))
    }
}

impl From<std::env::VarError> for FerrotuneError {
    fn from(err: std::env::VarError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for FerrotuneError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Database(format!("Task join error: {}", err))
    }
}

/// Result type alias for Ferrotune operations.
pub type Result<T> = std::result::Result<T, FerrotuneError>;
