//! Lavalink client construction and event relay.
//!
//! The Lavalink client owns the connection to the audio nodes. Its hooks run
//! on the backend's dispatch loop, so they do nothing but translate payloads
//! into [`PlayerEvent`]/[`NodeEvent`] values and push them into the sink; the
//! handler side runs on our own dispatcher tasks with full application state.

use super::events::{EventSink, NodeEvent, PlayerEvent, TrackSummary};
use crate::config::Config;
use crate::error::Result;
use crate::types::App;
use futures::future::BoxFuture;
use lavalink_rs::client::LavalinkClient;
use lavalink_rs::model::events;
use lavalink_rs::node::NodeBuilder;
use lavalink_rs::prelude::NodeDistributionStrategy;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::debug;

/// Correlation data attached to every player context at creation.
#[derive(Debug, Clone, Copy)]
pub struct PlayerData {
    pub guild_id: serenity::GuildId,
    pub text_channel: serenity::ChannelId,
    pub voice_channel: serenity::ChannelId,
}

/// Build the Lavalink client against the configured node.
pub async fn connect(
    config: &Config,
    user_id: serenity::UserId,
    sink: EventSink,
) -> LavalinkClient {
    let hooks = events::Events {
        ready: Some(node_ready),
        stats: Some(node_stats),
        track_start: Some(track_start),
        track_end: Some(track_end),
        ..Default::default()
    };

    let node = NodeBuilder {
        hostname: config.lavalink_host.clone(),
        is_ssl: config.lavalink_secure,
        events: events::Events::default(),
        password: config.lavalink_password.clone(),
        user_id: user_id.into(),
        session_id: None,
    };

    LavalinkClient::new_with_data(
        hooks,
        vec![node],
        NodeDistributionStrategy::round_robin(),
        Arc::new(sink),
    )
    .await
}

/// Condense a backend track into the fields handlers care about.
pub fn summarize(track: &lavalink_rs::model::track::TrackData) -> TrackSummary {
    TrackSummary {
        title: track.info.title.clone(),
        author: track.info.author.clone(),
        uri: track.info.uri.clone(),
        length_ms: track.info.length,
    }
}

/// Tear down a guild's playback session: Lavalink player, voice connection,
/// and side records.
pub async fn destroy(app: &App, guild_id: serenity::GuildId) -> Result<()> {
    app.tracker.remove(guild_id);

    if let Err(e) = app.lavalink.delete_player(guild_id).await {
        debug!("failed to delete lavalink player for guild {}: {}", guild_id, e);
    }

    if app.songbird.get(guild_id).is_some() {
        if let Err(e) = app.songbird.remove(guild_id).await {
            debug!("failed to leave voice channel in guild {}: {}", guild_id, e);
        }
    }

    Ok(())
}

fn node_ready(
    client: LavalinkClient,
    session_id: String,
    event: &events::Ready,
) -> BoxFuture<'static, ()> {
    let resumed = event.resumed;
    Box::pin(async move {
        if let Ok(sink) = client.data::<EventSink>() {
            let _ = sink.node.send(NodeEvent::Connected {
                session_id,
                resumed,
            });
        }
    })
}

fn node_stats(
    client: LavalinkClient,
    _session_id: String,
    event: &events::Stats,
) -> BoxFuture<'static, ()> {
    let players = event.players;
    let playing_players = event.playing_players;
    let uptime_ms = event.uptime;
    Box::pin(async move {
        if let Ok(sink) = client.data::<EventSink>() {
            let _ = sink.node.send(NodeEvent::Stats {
                players,
                playing_players,
                uptime_ms,
            });
        }
    })
}

fn track_start(
    client: LavalinkClient,
    _session_id: String,
    event: &events::TrackStart,
) -> BoxFuture<'static, ()> {
    let guild_id = serenity::GuildId::new(event.guild_id.0);
    let track = summarize(&event.track);
    Box::pin(async move {
        if let Ok(sink) = client.data::<EventSink>() {
            let _ = sink.player.send(PlayerEvent::TrackStart { guild_id, track });
        }
    })
}

fn track_end(
    client: LavalinkClient,
    _session_id: String,
    event: &events::TrackEnd,
) -> BoxFuture<'static, ()> {
    let guild_id = event.guild_id;
    let reason = event.reason.clone();
    Box::pin(async move {
        // Only a naturally finished track with an empty queue counts as the
        // queue ending; stops and replacements have their own flows.
        if !matches!(reason, events::TrackEndReason::Finished) {
            return;
        }
        let Some(player) = client.get_player_context(guild_id) else {
            return;
        };
        let queued = player.get_queue().get_count().await.unwrap_or(0);
        if queued > 0 {
            return;
        }
        if let Ok(sink) = client.data::<EventSink>() {
            let _ = sink.player.send(PlayerEvent::QueueEnd {
                guild_id: serenity::GuildId::new(guild_id.0),
            });
        }
    })
}
