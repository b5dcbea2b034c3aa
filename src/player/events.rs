//! Typed events relayed from the audio backend.
//!
//! Lavalink hooks translate backend payloads into these enums and push them
//! over channels; handler modules only ever see these types.

use poise::serenity_prelude as serenity;
use tokio::sync::mpsc::UnboundedSender;

/// A slimmed-down view of a Lavalink track.
#[derive(Debug, Clone)]
pub struct TrackSummary {
    pub title: String,
    pub author: String,
    pub uri: Option<String>,
    pub length_ms: u64,
}

/// Per-player lifecycle events.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// A track began playing.
    TrackStart {
        guild_id: serenity::GuildId,
        track: TrackSummary,
    },
    /// The queue ran dry: the last track finished and nothing is queued.
    QueueEnd { guild_id: serenity::GuildId },
}

impl PlayerEvent {
    /// The registration name handlers declare.
    pub fn name(&self) -> &'static str {
        match self {
            PlayerEvent::TrackStart { .. } => "track_start",
            PlayerEvent::QueueEnd { .. } => "queue_end",
        }
    }

    pub fn guild_id(&self) -> serenity::GuildId {
        match self {
            PlayerEvent::TrackStart { guild_id, .. } => *guild_id,
            PlayerEvent::QueueEnd { guild_id } => *guild_id,
        }
    }
}

/// Node-manager connectivity events.
#[derive(Debug, Clone)]
pub enum NodeEvent {
    /// A node finished its handshake.
    Connected { session_id: String, resumed: bool },
    /// Periodic node statistics.
    Stats {
        players: u64,
        playing_players: u64,
        uptime_ms: u64,
    },
}

impl NodeEvent {
    /// The registration name handlers declare.
    pub fn name(&self) -> &'static str {
        match self {
            NodeEvent::Connected { .. } => "connected",
            NodeEvent::Stats { .. } => "stats",
        }
    }
}

/// Channel ends the Lavalink hooks push translated events into.
pub struct EventSink {
    pub player: UnboundedSender<PlayerEvent>,
    pub node: UnboundedSender<NodeEvent>,
}
