//! Queue end: tidy the UI, then decide whether and when to leave voice.
//!
//! The sequence on every queue-end notification:
//! 1. resolve the owning guild, aborting if it is gone;
//! 2. flip the player panel to its idle state;
//! 3. clear the voice-channel status line;
//! 4. strip the control buttons off the recorded now-playing message;
//! 5. apply the idle window: stay put, leave now, or arm the leave timer.
//!
//! Steps 2–4 are best-effort cleanup; their failures are swallowed and never
//! block the idle decision. The timer re-checks that the player still exists
//! and is not playing before it disconnects, and arming it replaces any
//! previously armed timer.

use crate::error::Result;
use crate::player::{idle, manager, manager::PlayerData, IdleAction, PlayerEvent};
use crate::registry::{EventBinding, PlayerEventHandler};
use crate::setup::{self, PanelState};
use crate::types::Data;
use poise::serenity_prelude as serenity;
use serenity::EditMessage;
use std::time::Duration;
use tracing::{debug, warn};

pub fn binding() -> Result<EventBinding> {
    Ok(EventBinding::Player(PlayerEventHandler {
        name: "queue_end",
        run: |data, ctx, event| Box::pin(run(data, ctx, event)),
    }))
}

async fn run(data: Data, ctx: serenity::Context, event: PlayerEvent) -> Result<()> {
    let PlayerEvent::QueueEnd { guild_id } = event else {
        return Ok(());
    };

    if ctx.cache.guild(guild_id).is_none() {
        return Ok(());
    }

    let settings = data.db.get_settings(guild_id.get()).await.unwrap_or_default();
    let locale = settings.language.as_deref();

    if let Err(e) =
        setup::update_panel(&data, &ctx.http, guild_id, locale, PanelState::Idle).await
    {
        debug!("failed to reset player panel: {}", e);
    }

    if let Some(player) = data.lavalink.get_player_context(guild_id) {
        if let Ok(player_data) = player.data::<PlayerData>() {
            if let Err(e) = setup::set_voice_status(
                &data.http_client,
                &data.config.token,
                player_data.voice_channel.get(),
                "",
            )
            .await
            {
                debug!("failed to clear voice status: {}", e);
            }
        }
    }

    if let Some(message) = data.tracker.take_now_playing(guild_id) {
        strip_controls(&ctx, message).await;
    }

    let window = if settings.stay {
        // 24/7 mode pins the player in the channel
        -1
    } else {
        idle::effective_window(settings.idle_timeout, data.config.idle_secs)
    };

    match idle::idle_action(window) {
        IdleAction::Stay => {}
        IdleAction::DisconnectNow => {
            if let Err(e) = manager::destroy(&data, guild_id).await {
                warn!("failed to disconnect idle player in guild {}: {}", guild_id, e);
            }
        }
        IdleAction::ArmTimer(delay) => arm_idle_timer(data.clone(), guild_id, delay),
    }

    Ok(())
}

/// Arm the auto-leave timer, replacing any previously armed one.
fn arm_idle_timer(data: Data, guild_id: serenity::GuildId, delay: Duration) {
    let handle = tokio::spawn({
        let data = data.clone();
        async move {
            tokio::time::sleep(delay).await;

            // The player may be gone, or playing again, by the time we wake
            let playing = match data.lavalink.get_player_context(guild_id) {
                None => return,
                Some(player) => player
                    .get_player()
                    .await
                    .map(|p| p.track.is_some() && !p.paused)
                    .unwrap_or(false),
            };
            if playing {
                return;
            }

            if let Err(e) = manager::destroy(&data, guild_id).await {
                warn!("failed to disconnect idle player in guild {}: {}", guild_id, e);
            }
        }
    });
    data.tracker.arm_idle(guild_id, handle);
}

/// Best-effort removal of the control buttons from a now-playing message.
async fn strip_controls(ctx: &serenity::Context, message: crate::player::NowPlayingRef) {
    let Ok(mut fetched) = message
        .channel_id
        .message(&ctx.http, message.message_id)
        .await
    else {
        return;
    };
    let _ = fetched
        .edit(ctx, EditMessage::new().components(Vec::new()))
        .await;
}
