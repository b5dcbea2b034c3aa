//! Play command: join the author's voice channel and queue tracks.

use crate::error::{FerrotuneError, Result};
use crate::player::manager::PlayerData;
use crate::registry::{CommandDescriptor, CommandEntry, CommandOptionDescriptor};
use crate::types::{Context, Error};
use lavalink_rs::prelude::{SearchEngines, TrackInQueue, TrackLoadData};
use poise::serenity_prelude::{CommandOptionType, Permissions};
use std::sync::Arc;

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: play(),
        descriptor: CommandDescriptor {
            name: "play".to_string(),
            aliases: vec!["p".to_string()],
            category: "music".to_string(),
            description_key: "cmd.play.description".to_string(),
            user_permissions: Permissions::empty(),
            slash: true,
            options: vec![CommandOptionDescriptor {
                kind: CommandOptionType::String,
                name: "query".to_string(),
                description_key: "cmd.play.options.query".to_string(),
                required: true,
                options: Vec::new(),
            }],
        },
    })
}

/// Queue a track or playlist from a search term or URL.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("p"),
    category = "music",
    guild_only
)]
pub async fn play(
    context: Context<'_>,
    #[description = "Track name or URL"]
    #[rest]
    query: String,
) -> std::result::Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        return Ok(());
    };
    let data = context.data();
    let locale = data.guild_locale(Some(guild_id)).await;
    let locale = locale.as_deref();

    // The author has to be in a voice channel for the bot to join
    let voice_channel = context.guild().and_then(|guild| {
        guild
            .voice_states
            .get(&context.author().id)
            .and_then(|state| state.channel_id)
    });
    let Some(voice_channel) = voice_channel else {
        context
            .say(data.i18n.translate("cmd.play.not_in_voice", locale))
            .await?;
        return Ok(());
    };

    context.defer().await?;

    if data.lavalink.get_player_context(guild_id).is_none() {
        let (connection_info, _call) = data
            .songbird
            .join_gateway(guild_id, voice_channel)
            .await
            .map_err(|e| {
                FerrotuneError::Audio(format!("failed to join voice channel: {}", e))
            })?;

        data.lavalink
            .create_player_context_with_data(
                guild_id,
                connection_info,
                Arc::new(PlayerData {
                    guild_id,
                    text_channel: context.channel_id(),
                    voice_channel,
                }),
            )
            .await?;
    }

    let Some(player) = data.lavalink.get_player_context(guild_id) else {
        context
            .say(data.i18n.translate("player.nothing_playing", locale))
            .await?;
        return Ok(());
    };

    let term = if query.starts_with("http://") || query.starts_with("https://") {
        query.clone()
    } else {
        SearchEngines::YouTube.to_query(&query)?
    };
    let loaded = data.lavalink.load_tracks(guild_id, &term).await?;

    let mut first_title = None;
    let tracks: Vec<TrackInQueue> = match loaded.data {
        Some(TrackLoadData::Track(track)) => {
            first_title = Some(track.info.title.clone());
            vec![track.into()]
        }
        Some(TrackLoadData::Search(results)) => match results.into_iter().next() {
            Some(track) => {
                first_title = Some(track.info.title.clone());
                vec![track.into()]
            }
            None => Vec::new(),
        },
        Some(TrackLoadData::Playlist(playlist)) => {
            playlist.tracks.into_iter().map(Into::into).collect()
        }
        _ => Vec::new(),
    };

    if tracks.is_empty() {
        context
            .say(data.i18n.translate("cmd.play.no_results", locale))
            .await?;
        return Ok(());
    }

    let count = tracks.len();
    let queue = player.get_queue();
    queue.append(tracks.into())?;

    // Kick playback if the player is sitting idle
    if let Ok(current) = player.get_player().await {
        if current.track.is_none() && queue.get_track(0).await.is_ok_and(|t| t.is_some()) {
            player.skip()?;
        }
    }

    let reply = match first_title {
        Some(title) => data
            .i18n
            .translate("cmd.play.queued", locale)
            .replace("{title}", &title),
        None => data
            .i18n
            .translate("cmd.play.queued_many", locale)
            .replace("{count}", &count.to_string()),
    };
    context.say(reply).await?;

    Ok(())
}
