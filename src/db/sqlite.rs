//! SQLite-backed settings stores.
//!
//! Covers two of the three backends: a plain database file, and the embedded
//! default which roots the same engine inside a managed data directory.

use super::store::{GuildSettings, SettingsStore, SetupRecord};
use crate::error::{FerrotuneError, Result};
use poise::serenity_prelude::async_trait;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS guild_settings (
    guild_id TEXT NOT NULL PRIMARY KEY,
    language TEXT,
    idle_timeout INTEGER,
    setup_channel_id TEXT,
    setup_message_id TEXT,
    stay INTEGER NOT NULL DEFAULT 0
)";

/// Settings store backed by a SQLite database file.
///
/// One connection is opened for the lifetime of the process; queries run on
/// the blocking thread pool.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (creating if needed) the database file and initialize the schema.
    ///
    /// The parent directory is created if it does not exist.
    pub async fn open(path: &str) -> Result<Self> {
        let path = path.to_string();
        let conn = tokio::task::spawn_blocking(move || -> Result<Connection> {
            if let Some(parent) = Path::new(&path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let conn = Connection::open(&path)?;
            conn.execute(SCHEMA, [])?;
            Ok(conn)
        })
        .await??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the shared connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| FerrotuneError::Database("connection lock poisoned".to_string()))?;
            f(&guard)
        })
        .await?
    }
}

#[async_trait]
impl SettingsStore for SqliteStore {
    async fn get_settings(&self, guild_id: u64) -> Result<GuildSettings> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT language, idle_timeout, setup_channel_id, setup_message_id, stay
                 FROM guild_settings WHERE guild_id = ?1",
            )?;

            let mut rows = stmt.query(rusqlite::params![guild_id.to_string()])?;

            if let Some(row) = rows.next()? {
                let channel: Option<String> = row.get(2)?;
                let message: Option<String> = row.get(3)?;
                let stay: i64 = row.get(4)?;
                Ok(GuildSettings {
                    language: row.get(0)?,
                    idle_timeout: row.get(1)?,
                    setup: setup_from_columns(channel, message),
                    stay: stay != 0,
                })
            } else {
                Ok(GuildSettings::default())
            }
        })
        .await
    }

    async fn set_language(&self, guild_id: u64, language: &str) -> Result<()> {
        let language = language.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO guild_settings (guild_id, language) VALUES (?1, ?2)
                 ON CONFLICT(guild_id) DO UPDATE SET language = ?2",
                rusqlite::params![guild_id.to_string(), language],
            )?;
            Ok(())
        })
        .await
    }

    async fn set_idle_timeout(&self, guild_id: u64, seconds: Option<i64>) -> Result<()> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO guild_settings (guild_id, idle_timeout) VALUES (?1, ?2)
                 ON CONFLICT(guild_id) DO UPDATE SET idle_timeout = ?2",
                rusqlite::params![guild_id.to_string(), seconds],
            )?;
            Ok(())
        })
        .await
    }

    async fn set_setup(&self, guild_id: u64, record: Option<SetupRecord>) -> Result<()> {
        self.with_conn(move |conn| {
            let channel = record.map(|r| r.channel_id.to_string());
            let message = record.map(|r| r.message_id.to_string());
            conn.execute(
                "INSERT INTO guild_settings (guild_id, setup_channel_id, setup_message_id)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(guild_id) DO UPDATE SET setup_channel_id = ?2, setup_message_id = ?3",
                rusqlite::params![guild_id.to_string(), channel, message],
            )?;
            Ok(())
        })
        .await
    }

    async fn set_stay(&self, guild_id: u64, stay: bool) -> Result<()> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO guild_settings (guild_id, stay) VALUES (?1, ?2)
                 ON CONFLICT(guild_id) DO UPDATE SET stay = ?2",
                rusqlite::params![guild_id.to_string(), stay as i64],
            )?;
            Ok(())
        })
        .await
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

/// The embedded backend: the same engine, rooted in a managed data directory.
pub struct EmbeddedStore {
    inner: SqliteStore,
}

impl EmbeddedStore {
    /// Create the data directory if needed and open the store inside it.
    pub async fn open(dir: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = Path::new(dir).join("settings.db");
        let path = path
            .to_str()
            .ok_or_else(|| {
                FerrotuneError::Database(format!("data directory path is not valid UTF-8: {:?}", path))
            })?
            .to_string();
        Ok(Self {
            inner: SqliteStore::open(&path).await?,
        })
    }
}

#[async_trait]
impl SettingsStore for EmbeddedStore {
    async fn get_settings(&self, guild_id: u64) -> Result<GuildSettings> {
        self.inner.get_settings(guild_id).await
    }

    async fn set_language(&self, guild_id: u64, language: &str) -> Result<()> {
        self.inner.set_language(guild_id, language).await
    }

    async fn set_idle_timeout(&self, guild_id: u64, seconds: Option<i64>) -> Result<()> {
        self.inner.set_idle_timeout(guild_id, seconds).await
    }

    async fn set_setup(&self, guild_id: u64, record: Option<SetupRecord>) -> Result<()> {
        self.inner.set_setup(guild_id, record).await
    }

    async fn set_stay(&self, guild_id: u64, stay: bool) -> Result<()> {
        self.inner.set_stay(guild_id, stay).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Helper function to create a test store in a temporary directory
    async fn setup_test_store() -> (TempDir, SqliteStore) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_str().expect("Invalid path").to_string();

        let store = SqliteStore::open(&db_path_str)
            .await
            .expect("Failed to open store");
        (temp_dir, store)
    }

    #[tokio::test]
    async fn test_missing_row_reads_as_default() {
        let (_temp_dir, store) = setup_test_store().await;

        let settings = store.get_settings(1).await.unwrap();
        assert_eq!(settings, GuildSettings::default());
        assert!(store.get_language(1).await.unwrap().is_none());
        assert!(store.get_setup(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_language_creates_and_updates() {
        let (_temp_dir, store) = setup_test_store().await;

        store.set_language(42, "es-ES").await.unwrap();
        assert_eq!(
            store.get_language(42).await.unwrap().as_deref(),
            Some("es-ES")
        );

        store.set_language(42, "fr").await.unwrap();
        assert_eq!(store.get_language(42).await.unwrap().as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn test_fields_update_independently() {
        let (_temp_dir, store) = setup_test_store().await;

        store.set_language(7, "en").await.unwrap();
        store.set_idle_timeout(7, Some(120)).await.unwrap();
        store.set_stay(7, true).await.unwrap();

        let settings = store.get_settings(7).await.unwrap();
        assert_eq!(settings.language.as_deref(), Some("en"));
        assert_eq!(settings.idle_timeout, Some(120));
        assert!(settings.stay);

        // Clearing the override leaves the rest alone
        store.set_idle_timeout(7, None).await.unwrap();
        let settings = store.get_settings(7).await.unwrap();
        assert_eq!(settings.idle_timeout, None);
        assert_eq!(settings.language.as_deref(), Some("en"));
        assert!(settings.stay);
    }

    #[tokio::test]
    async fn test_setup_record_roundtrip_and_clear() {
        let (_temp_dir, store) = setup_test_store().await;

        let record = SetupRecord {
            channel_id: 123456789012345678,
            message_id: 987654321098765432,
        };
        store.set_setup(9, Some(record)).await.unwrap();
        assert_eq!(store.get_setup(9).await.unwrap(), Some(record));

        store.set_setup(9, None).await.unwrap();
        assert_eq!(store.get_setup(9).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_embedded_store_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("nested").join("data");
        let data_dir_str = data_dir.to_str().unwrap().to_string();

        let store = EmbeddedStore::open(&data_dir_str).await.unwrap();
        assert!(data_dir.join("settings.db").exists());

        store.set_language(1, "en").await.unwrap();
        assert_eq!(store.get_language(1).await.unwrap().as_deref(), Some("en"));
    }
}
