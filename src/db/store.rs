//! The guild-settings repository interface.
//!
//! A deliberately narrow trait: the handful of queries the bot actually
//! issues, with one implementation per supported backend. Callers never see
//! backend-specific types.

use crate::error::Result;
use poise::serenity_prelude::async_trait;

/// Location of a guild's persistent player panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupRecord {
    pub channel_id: u64,
    pub message_id: u64,
}

/// Per-guild settings row. Absent rows read back as the default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuildSettings {
    /// Preferred locale for this guild
    pub language: Option<String>,
    /// Per-guild override of the idle window, in seconds
    pub idle_timeout: Option<i64>,
    /// Player panel location, if one was created
    pub setup: Option<SetupRecord>,
    /// 24/7 mode: never auto-leave the voice channel
    pub stay: bool,
}

/// Guild-keyed settings storage.
///
/// Rows are created on first write and updated in place; nothing here ever
/// deletes a row.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a guild's settings, defaulting when no row exists.
    async fn get_settings(&self, guild_id: u64) -> Result<GuildSettings>;

    /// Set the guild's preferred language.
    async fn set_language(&self, guild_id: u64, language: &str) -> Result<()>;

    /// Set or clear the guild's idle-window override.
    async fn set_idle_timeout(&self, guild_id: u64, seconds: Option<i64>) -> Result<()>;

    /// Set or clear the guild's player-panel location.
    async fn set_setup(&self, guild_id: u64, record: Option<SetupRecord>) -> Result<()>;

    /// Toggle 24/7 mode.
    async fn set_stay(&self, guild_id: u64, stay: bool) -> Result<()>;

    /// The guild's preferred language, if set.
    async fn get_language(&self, guild_id: u64) -> Result<Option<String>> {
        Ok(self.get_settings(guild_id).await?.language)
    }

    /// The guild's player-panel location, if one was created.
    async fn get_setup(&self, guild_id: u64) -> Result<Option<SetupRecord>> {
        Ok(self.get_settings(guild_id).await?.setup)
    }
}
