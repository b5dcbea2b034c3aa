//! Ferrotune library.
//!
//! This library provides the core functionality for the Ferrotune Discord
//! music bot: configuration, guild-settings persistence, command and event
//! registries, slash-command sync, and the player lifecycle handling around
//! the Lavalink audio backend.

pub mod bot;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod i18n;
pub mod player;
pub mod registry;
pub mod setup;
pub mod shutdown;
pub mod stats;
pub mod sync;
pub mod types;

pub use config::Config;
pub use error::{FerrotuneError, Result};
