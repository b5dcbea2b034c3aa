//! The persistent player panel and related UI upkeep.
//!
//! Guilds can pin a "player panel" message that the bot keeps updated with
//! the playing/idle state. Panel edits are best-effort: a deleted message or
//! missing channel is treated as nothing to update.

use crate::error::{FerrotuneError, Result};
use crate::i18n::I18n;
use crate::player::{format_duration, TrackSummary};
use crate::types::App;
use poise::serenity_prelude as serenity;
use serenity::{
    ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, EditMessage,
};

/// What the panel should show.
#[derive(Debug, Clone, Copy)]
pub enum PanelState<'a> {
    Idle,
    Playing(&'a TrackSummary),
}

/// Custom-id prefix shared by all playback control buttons.
pub const CONTROL_PREFIX: &str = "player:";

/// The playback control buttons attached to the panel and to now-playing
/// messages.
pub fn control_row() -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new("player:pause")
            .label("⏯")
            .style(ButtonStyle::Secondary),
        CreateButton::new("player:skip")
            .label("⏭")
            .style(ButtonStyle::Secondary),
        CreateButton::new("player:stop")
            .label("⏹")
            .style(ButtonStyle::Danger),
    ])
}

/// Build the panel embed for a state.
pub fn panel_embed(i18n: &I18n, locale: Option<&str>, state: PanelState<'_>) -> CreateEmbed {
    match state {
        PanelState::Idle => CreateEmbed::new()
            .title(i18n.translate("panel.idle.title", locale))
            .description(i18n.translate("panel.idle.description", locale)),
        PanelState::Playing(track) => CreateEmbed::new()
            .title(i18n.translate("panel.playing.title", locale))
            .description(track_line(track)),
    }
}

/// Build the embed posted when a track starts.
pub fn now_playing_embed(i18n: &I18n, locale: Option<&str>, track: &TrackSummary) -> CreateEmbed {
    CreateEmbed::new()
        .title(i18n.translate("panel.playing.title", locale))
        .description(track_line(track))
}

fn track_line(track: &TrackSummary) -> String {
    let label = match &track.uri {
        Some(uri) => format!("[{}]({})", track.title, uri),
        None => track.title.clone(),
    };
    format!(
        "{} — {} `[{}]`",
        label,
        track.author,
        format_duration(track.length_ms)
    )
}

/// Refresh the guild's panel message, if one is set up.
pub async fn update_panel(
    app: &App,
    http: impl serenity::CacheHttp,
    guild_id: serenity::GuildId,
    locale: Option<&str>,
    state: PanelState<'_>,
) -> Result<()> {
    let Some(setup) = app.db.get_setup(guild_id.get()).await? else {
        return Ok(());
    };

    let embed = panel_embed(&app.i18n, locale, state);
    serenity::ChannelId::new(setup.channel_id)
        .edit_message(
            http,
            serenity::MessageId::new(setup.message_id),
            EditMessage::new().embed(embed).components(vec![control_row()]),
        )
        .await?;

    Ok(())
}

/// Default Discord REST endpoint.
pub const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Set (or clear, with an empty string) a voice channel's status line.
///
/// The SDK does not cover this route, so it goes through the REST API
/// directly.
pub async fn set_voice_status(
    client: &reqwest::Client,
    token: &str,
    channel_id: u64,
    status: &str,
) -> Result<()> {
    set_voice_status_at(DISCORD_API_BASE, client, token, channel_id, status).await
}

async fn set_voice_status_at(
    base: &str,
    client: &reqwest::Client,
    token: &str,
    channel_id: u64,
    status: &str,
) -> Result<()> {
    let url = format!("{}/channels/{}/voice-status", base, channel_id);
    let resp = client
        .put(&url)
        .header("Authorization", format!("Bot {}", token))
        .json(&serde_json::json!({ "status": status }))
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(FerrotuneError::Network(format!(
            "voice status update returned {}",
            resp.status()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_i18n() -> I18n {
        I18n::load().unwrap()
    }

    fn track() -> TrackSummary {
        TrackSummary {
            title: "Test Track".to_string(),
            author: "Test Author".to_string(),
            uri: Some("https://example.com/t".to_string()),
            length_ms: 125_000,
        }
    }

    #[test]
    fn test_track_line_includes_link_and_duration() {
        let line = track_line(&track());
        assert!(line.contains("[Test Track](https://example.com/t)"));
        assert!(line.contains("2:05"));
    }

    #[test]
    fn test_track_line_without_uri() {
        let mut t = track();
        t.uri = None;
        let line = track_line(&t);
        assert!(line.starts_with("Test Track"));
    }

    #[test]
    fn test_panel_embed_builds_for_both_states() {
        let i18n = fixture_i18n();
        let t = track();
        // Embeds are builders without getters; serialize to inspect
        let idle = serde_json::to_value(panel_embed(&i18n, None, PanelState::Idle)).unwrap();
        assert_eq!(idle["title"].as_str().unwrap(), "Nothing playing");

        let playing =
            serde_json::to_value(panel_embed(&i18n, None, PanelState::Playing(&t))).unwrap();
        assert_eq!(playing["title"].as_str().unwrap(), "Now playing");
        assert!(playing["description"].as_str().unwrap().contains("Test Track"));
    }

    #[tokio::test]
    async fn test_set_voice_status_hits_route() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/channels/42/voice-status")
            .match_header("authorization", "Bot token")
            .with_status(204)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        set_voice_status_at(&server.url(), &client, "token", 42, "♪ something")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_voice_status_surfaces_http_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/channels/42/voice-status")
            .with_status(403)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let result = set_voice_status_at(&server.url(), &client, "token", 42, "").await;
        assert!(result.is_err());
    }
}
