//! Database backend selection and connection.
//!
//! Guild settings can live in one of three interchangeable backends: a
//! networked PostgreSQL server, a SQLite database file, or an embedded store
//! rooted in a local directory. The connection string shape picks the backend;
//! callers only ever see the [`SettingsStore`] trait.

pub mod postgres;
pub mod sqlite;
pub mod store;

pub use store::{GuildSettings, SettingsStore, SetupRecord};

use crate::error::Result;
use tracing::info;
use url::Url;

/// The kind of backend a connection string maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseKind {
    /// Networked PostgreSQL (`postgres://` / `postgresql://`)
    Postgres,
    /// Embedded store rooted in a local directory (the default)
    Embedded,
    /// SQLite database file
    Sqlite,
}

impl DatabaseKind {
    /// Classify a connection string into a backend kind.
    ///
    /// This is a pure function: it performs no I/O and maps every input,
    /// including garbage, to exactly one backend.
    pub fn classify(url: Option<&str>) -> DatabaseKind {
        let Some(url) = url else {
            return DatabaseKind::Embedded;
        };

        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return DatabaseKind::Postgres;
        }

        if url.starts_with("sqlite:") || has_sqlite_extension(url) {
            return DatabaseKind::Sqlite;
        }

        if url.starts_with("file:") {
            // Query parameters (e.g. ?mode=ro) mark a SQLite URI
            let has_query = match Url::parse(url) {
                Ok(parsed) => parsed.query().is_some(),
                Err(_) => url.contains('?'),
            };
            if has_query || has_sqlite_extension(url) {
                return DatabaseKind::Sqlite;
            }
            // A bare file: path with no extension is an embedded data directory
            return DatabaseKind::Embedded;
        }

        DatabaseKind::Embedded
    }
}

fn has_sqlite_extension(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.ends_with(".db") || lower.ends_with(".sqlite") || lower.ends_with(".sqlite3")
}

/// Default data directory for the embedded backend.
const DEFAULT_EMBEDDED_DIR: &str = "./ferrotune-data";

/// Connect to the backend selected by the connection string.
///
/// Exactly one handle is opened for the lifetime of the process. Connection
/// failures are returned to the caller, which treats them as fatal.
pub async fn connect(url: Option<&str>) -> Result<Box<dyn SettingsStore>> {
    match DatabaseKind::classify(url) {
        DatabaseKind::Postgres => {
            // classify() only yields Postgres for a present URL
            let store = postgres::PostgresStore::connect(url.unwrap_or_default()).await?;
            info!("connected to PostgreSQL");
            Ok(Box::new(store))
        }
        DatabaseKind::Sqlite => {
            let path = sqlite_path(url.unwrap_or_default());
            let store = sqlite::SqliteStore::open(&path).await?;
            info!("connected to SQLite at {}", path);
            Ok(Box::new(store))
        }
        DatabaseKind::Embedded => {
            let dir = url
                .map(|u| u.trim_start_matches("file:").to_string())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_EMBEDDED_DIR.to_string());
            let store = sqlite::EmbeddedStore::open(&dir).await?;
            info!("connected to embedded store at {}", dir);
            Ok(Box::new(store))
        }
    }
}

/// Strip scheme prefixes and URI query parameters from a SQLite connection
/// string, leaving a plain filesystem path.
fn sqlite_path(url: &str) -> String {
    let path = url
        .trim_start_matches("file:")
        .trim_start_matches("sqlite:");
    match path.split_once('?') {
        Some((head, _)) => head.to_string(),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_postgres_schemes() {
        assert_eq!(
            DatabaseKind::classify(Some("postgres://user:pw@localhost/bot")),
            DatabaseKind::Postgres
        );
        assert_eq!(
            DatabaseKind::classify(Some("postgresql://localhost:5432/bot")),
            DatabaseKind::Postgres
        );
    }

    #[test]
    fn test_classify_sqlite_shapes() {
        assert_eq!(
            DatabaseKind::classify(Some("sqlite:bot.db")),
            DatabaseKind::Sqlite
        );
        assert_eq!(
            DatabaseKind::classify(Some("data/bot.db")),
            DatabaseKind::Sqlite
        );
        assert_eq!(
            DatabaseKind::classify(Some("bot.sqlite")),
            DatabaseKind::Sqlite
        );
        assert_eq!(
            DatabaseKind::classify(Some("bot.SQLITE3")),
            DatabaseKind::Sqlite
        );
    }

    #[test]
    fn test_classify_file_scheme() {
        // Query parameters mark a SQLite URI
        assert_eq!(
            DatabaseKind::classify(Some("file:bot?mode=ro")),
            DatabaseKind::Sqlite
        );
        // A database file extension marks a SQLite file
        assert_eq!(
            DatabaseKind::classify(Some("file:bot.db")),
            DatabaseKind::Sqlite
        );
        // Bare file: paths are embedded data directories
        assert_eq!(
            DatabaseKind::classify(Some("file:data")),
            DatabaseKind::Embedded
        );
    }

    #[test]
    fn test_classify_defaults_to_embedded() {
        assert_eq!(DatabaseKind::classify(None), DatabaseKind::Embedded);
        assert_eq!(DatabaseKind::classify(Some("")), DatabaseKind::Embedded);
        assert_eq!(
            DatabaseKind::classify(Some("something-else")),
            DatabaseKind::Embedded
        );
    }

    #[test]
    fn test_classification_is_total_and_pure() {
        let inputs = [
            None,
            Some("postgres://a/b"),
            Some("postgresql://a/b"),
            Some("sqlite:x"),
            Some("x.db"),
            Some("x.sqlite"),
            Some("x.sqlite3"),
            Some("file:x?y=z"),
            Some("file:x.db"),
            Some("file:x"),
            Some("file:"),
            Some("not a url at all ???"),
            Some("ftp://weird"),
        ];
        for input in inputs {
            let first = DatabaseKind::classify(input);
            // Same input, same answer
            assert_eq!(first, DatabaseKind::classify(input));
        }
    }

    #[test]
    fn test_sqlite_path_normalization() {
        assert_eq!(sqlite_path("sqlite:bot.db"), "bot.db");
        assert_eq!(sqlite_path("file:bot.db?mode=ro"), "bot.db");
        assert_eq!(sqlite_path("data/bot.db"), "data/bot.db");
    }
}
