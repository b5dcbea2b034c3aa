//! Track start: announce the track and refresh the UI.

use crate::error::Result;
use crate::player::{manager::PlayerData, NowPlayingRef, PlayerEvent};
use crate::registry::{EventBinding, PlayerEventHandler};
use crate::setup::{self, PanelState};
use crate::types::Data;
use poise::serenity_prelude as serenity;
use serenity::CreateMessage;
use tracing::debug;

pub fn binding() -> Result<EventBinding> {
    Ok(EventBinding::Player(PlayerEventHandler {
        name: "track_start",
        run: |data, ctx, event| Box::pin(run(data, ctx, event)),
    }))
}

async fn run(data: Data, ctx: serenity::Context, event: PlayerEvent) -> Result<()> {
    let PlayerEvent::TrackStart { guild_id, track } = event else {
        return Ok(());
    };

    // A new track supersedes any pending auto-leave
    data.tracker.disarm_idle(guild_id);

    let locale = data.guild_locale(Some(guild_id)).await;
    let locale = locale.as_deref();

    let Some(player) = data.lavalink.get_player_context(guild_id) else {
        return Ok(());
    };
    let player_data = player.data::<PlayerData>()?;

    let embed = setup::now_playing_embed(&data.i18n, locale, &track);
    match player_data
        .text_channel
        .send_message(
            &ctx.http,
            CreateMessage::new()
                .embed(embed)
                .components(vec![setup::control_row()]),
        )
        .await
    {
        Ok(message) => data.tracker.set_now_playing(
            guild_id,
            Some(NowPlayingRef {
                channel_id: message.channel_id,
                message_id: message.id,
            }),
        ),
        Err(e) => debug!("failed to post now-playing message: {}", e),
    }

    let status = data
        .i18n
        .translate("player.voice_status", locale)
        .replace("{title}", &track.title);
    if let Err(e) = setup::set_voice_status(
        &data.http_client,
        &data.config.token,
        player_data.voice_channel.get(),
        &status,
    )
    .await
    {
        debug!("failed to set voice status: {}", e);
    }

    if let Err(e) =
        setup::update_panel(&data, &ctx.http, guild_id, locale, PanelState::Playing(&track)).await
    {
        debug!("failed to refresh player panel: {}", e);
    }

    Ok(())
}
