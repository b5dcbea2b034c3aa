//! Configuration management for Ferrotune.
//!
//! This module handles loading and validating environment variables and application settings.

use crate::error::{FerrotuneError, Result};
use std::env;

/// Configuration for the application, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token
    pub token: String,
    /// Database connection string; absence selects the embedded backend
    pub database_url: Option<String>,
    /// Seconds to stay in an empty voice channel after the queue ends.
    /// `-1` disables auto-leave, `0` leaves immediately.
    pub idle_secs: i64,
    /// Prefix for text commands
    pub prefix: String,
    /// Lavalink node address (host:port)
    pub lavalink_host: String,
    /// Lavalink node password
    pub lavalink_password: String,
    /// Whether the Lavalink node is reached over TLS
    pub lavalink_secure: bool,
    /// Optional top.gg API token for server-count reporting
    pub topgg_token: Option<String>,
    /// Optional guild to scope slash-command deployment to (useful in development)
    pub guild_id: Option<u64>,
}

/// Default idle window when `IDLE_TIMEOUT` is not set.
pub const DEFAULT_IDLE_SECS: i64 = 60;

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This will attempt to load a .env file if present using dotenv,
    /// then read required environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required environment variable is missing or invalid.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors - it's optional)
        dotenv::dotenv().ok();

        let token = env::var("DISCORD_TOKEN").map_err(|_| {
            FerrotuneError::Config(
                "Missing DISCORD_TOKEN environment variable. Set it in your environment or create a .env file (never commit this file).".to_string(),
            )
        })?;

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let idle_secs = match env::var("IDLE_TIMEOUT") {
            Ok(raw) => parse_idle_timeout(&raw)?,
            Err(_) => DEFAULT_IDLE_SECS,
        };

        let prefix = env::var("PREFIX").unwrap_or_else(|_| "!".to_string());

        let lavalink_host =
            env::var("LAVALINK_HOST").unwrap_or_else(|_| "localhost:2333".to_string());
        Self::validate_node_address(&lavalink_host)?;

        let lavalink_password =
            env::var("LAVALINK_PASSWORD").unwrap_or_else(|_| "youshallnotpass".to_string());

        let lavalink_secure = match env::var("LAVALINK_SECURE") {
            Ok(raw) => parse_bool(&raw).ok_or_else(|| {
                FerrotuneError::Config(format!("Invalid LAVALINK_SECURE value: '{}'", raw))
            })?,
            Err(_) => false,
        };

        let topgg_token = env::var("TOPGG_TOKEN").ok().filter(|v| !v.is_empty());

        let guild_id = match env::var("GUILD_ID") {
            Ok(raw) => Some(raw.parse::<u64>().map_err(|_| {
                FerrotuneError::Config(format!("Invalid GUILD_ID value: '{}'", raw))
            })?),
            Err(_) => None,
        };

        Ok(Self {
            token,
            database_url,
            idle_secs,
            prefix,
            lavalink_host,
            lavalink_password,
            lavalink_secure,
            topgg_token,
            guild_id,
        })
    }

    /// Validate that the Lavalink node address has a valid `host:port` format.
    fn validate_node_address(address: &str) -> Result<()> {
        if !address.contains(':') {
            return Err(FerrotuneError::Config(format!(
                "Invalid LAVALINK_HOST format: '{}'. Expected 'host:port' format.",
                address
            )));
        }

        // Try to parse port
        if let Some((_, port_str)) = address.rsplit_once(':') {
            port_str.parse::<u16>().map_err(|_| {
                FerrotuneError::Config(format!("Invalid port in LAVALINK_HOST: '{}'", port_str))
            })?;
        }

        Ok(())
    }
}

/// Parse the idle-timeout setting. Any negative value is normalized to the
/// `-1` "disabled" sentinel.
fn parse_idle_timeout(raw: &str) -> Result<i64> {
    let secs = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| FerrotuneError::Config(format!("Invalid IDLE_TIMEOUT value: '{}'", raw)))?;
    Ok(if secs < 0 { -1 } else { secs })
}

/// Parse a boolean-ish environment value.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_node_address() {
        assert!(Config::validate_node_address("localhost:2333").is_ok());
        assert!(Config::validate_node_address("127.0.0.1:2333").is_ok());
        assert!(Config::validate_node_address("lavalink.example.com:443").is_ok());

        assert!(Config::validate_node_address("localhost").is_err());
        assert!(Config::validate_node_address("localhost:abc").is_err());
        assert!(Config::validate_node_address("localhost:99999").is_err());
    }

    #[test]
    fn test_parse_idle_timeout() {
        assert_eq!(parse_idle_timeout("60").unwrap(), 60);
        assert_eq!(parse_idle_timeout("0").unwrap(), 0);
        assert_eq!(parse_idle_timeout("-1").unwrap(), -1);
        // Any negative marker means "disabled"
        assert_eq!(parse_idle_timeout("-30").unwrap(), -1);
        assert_eq!(parse_idle_timeout(" 15 ").unwrap(), 15);

        assert!(parse_idle_timeout("soon").is_err());
        assert!(parse_idle_timeout("").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
