//! PostgreSQL-backed settings store.

use super::store::{GuildSettings, SettingsStore, SetupRecord};
use crate::error::Result;
use poise::serenity_prelude::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS guild_settings (
    guild_id TEXT NOT NULL PRIMARY KEY,
    language TEXT,
    idle_timeout BIGINT,
    setup_channel_id TEXT,
    setup_message_id TEXT,
    stay BOOLEAN NOT NULL DEFAULT FALSE
)";

/// Settings store backed by a networked PostgreSQL server.
///
/// The pool is the single handle held for the process lifetime.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to the server and initialize the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        sqlx::query(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl SettingsStore for PostgresStore {
    async fn get_settings(&self, guild_id: u64) -> Result<GuildSettings> {
        let row = sqlx::query(
            "SELECT language, idle_timeout, setup_channel_id, setup_message_id, stay
             FROM guild_settings WHERE guild_id = $1",
        )
        .bind(guild_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(GuildSettings::default());
        };

        let channel: Option<String> = row.try_get("setup_channel_id")?;
        let message: Option<String> = row.try_get("setup_message_id")?;
        Ok(GuildSettings {
            language: row.try_get("language")?,
            idle_timeout: row.try_get("idle_timeout")?,
            setup: setup_from_columns(channel, message),
            stay: row.try_get("stay")?,
        })
    }

    async fn set_language(&self, guild_id: u64, language: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO guild_settings (guild_id, language) VALUES ($1, $2)
             ON CONFLICT (guild_id) DO UPDATE SET language = EXCLUDED.language",
        )
        .bind(guild_id.to_string())
        .bind(language)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_idle_timeout(&self, guild_id: u64, seconds: Option<i64>) -> Result<()> {
        sqlx::query(
            "INSERT INTO guild_settings (guild_id, idle_timeout) VALUES ($1, $2)
             ON CONFLICT (guild_id) DO UPDATE SET idle_timeout = EXCLUDED.idle_timeout",
        )
        .bind(guild_id.to_string())
        .bind(seconds)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_setup(&self, guild_id: u64, record: Option<SetupRecord>) -> Result<()> {
        sqlx::query(
            "INSERT INTO guild_settings (guild_id, setup_channel_id, setup_message_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (guild_id) DO UPDATE
             SET setup_channel_id = EXCLUDED.setup_channel_id,
                 setup_message_id = EXCLUDED.setup_message_id",
        )
        .bind(guild_id.to_string())
        .bind(record.map(|r| r.channel_id.to_string()))
        .bind(record.map(|r| r.message_id.to_string()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_stay(&self, guild_id: u64, stay: bool) -> Result<()> {
        sqlx::query(
            "INSERT INTO guild_settings (guild_id, stay) VALUES ($1, $2)
             ON CONFLICT (guild_id) DO UPDATE SET stay = EXCLUDED.stay",
        )
        .bind(guild_id.to_string())
        .bind(stay)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn setup_from_columns(channel: Option<String>, message: Option<String>) -> Option<SetupRecord> {
    let channel_id = channel?.parse().ok()?;
    let message_id = message?.parse().ok()?;
    Some(SetupRecord {
        channel_id,
        message_id,
    })
}
