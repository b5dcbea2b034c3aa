//! Type definitions and aliases for the bot.
//!
//! This module contains shared types used throughout the application.

use crate::config::Config;
use crate::db::SettingsStore;
use crate::i18n::I18n;
use crate::player::PlayerTracker;
use crate::registry::{ClientEventHandler, CommandIndex};
use lavalink_rs::client::LavalinkClient;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Application state shared across all commands and event handlers.
///
/// Owned by one top-level context and passed explicitly; there is no ambient
/// global state.
pub struct App {
    /// Resolved configuration
    pub config: Config,
    /// Guild settings, behind whichever backend the connection string selected
    pub db: Box<dyn SettingsStore>,
    /// Translation tables
    pub i18n: I18n,
    /// HTTP client for third-party APIs and raw REST routes
    pub http_client: reqwest::Client,
    /// Lavalink client (players, queues, nodes)
    pub lavalink: LavalinkClient,
    /// Voice gateway manager
    pub songbird: Arc<songbird::Songbird>,
    /// Per-player side records (now-playing message, idle timer)
    pub tracker: PlayerTracker,
    /// Loaded command descriptors with their name/alias index
    pub commands: CommandIndex,
    /// Chat-client event handlers, dispatched by event name
    pub client_events: Vec<ClientEventHandler>,
    /// Process start time, for uptime reporting
    pub started_at: std::time::Instant,
}

impl App {
    /// The locale configured for a guild, if any.
    ///
    /// Lookup failures read as "no preference" so a broken row never breaks a
    /// reply.
    pub async fn guild_locale(&self, guild_id: Option<serenity::GuildId>) -> Option<String> {
        let guild_id = guild_id?;
        self.db.get_language(guild_id.get()).await.ok().flatten()
    }
}

/// Bot application data shared across all commands.
pub type Data = Arc<App>;

/// Error type for bot commands.
pub type Error = crate::error::FerrotuneError;

/// Command context type alias for easier usage.
pub type Context<'a> = poise::Context<'a, Data, Error>;
