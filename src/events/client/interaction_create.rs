//! Button presses on bot-owned control messages.
//!
//! Only buttons on the guild's player panel or on the recorded now-playing
//! message are acted on; anything else is left for other interaction flows.

use crate::error::Result;
use crate::player::manager;
use crate::registry::{ClientEventHandler, EventBinding};
use crate::setup::CONTROL_PREFIX;
use crate::types::Data;
use poise::serenity_prelude as serenity;
use tracing::debug;

pub fn binding() -> Result<EventBinding> {
    Ok(EventBinding::Client(ClientEventHandler {
        name: "interaction_create",
        run: |ctx, event, data| Box::pin(run(ctx, event, data)),
    }))
}

async fn run(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &Data,
) -> Result<()> {
    let serenity::FullEvent::InteractionCreate { interaction } = event else {
        return Ok(());
    };
    let Some(component) = interaction.as_message_component() else {
        return Ok(());
    };
    let Some(guild_id) = component.guild_id else {
        return Ok(());
    };
    if !component.data.custom_id.starts_with(CONTROL_PREFIX) {
        return Ok(());
    }

    if !is_control_surface(data, guild_id, component).await {
        return Ok(());
    }

    // Acknowledge before doing anything slow
    if let Err(e) = component
        .create_response(&ctx.http, serenity::CreateInteractionResponse::Acknowledge)
        .await
    {
        debug!("failed to acknowledge control button: {}", e);
    }

    let Some(player) = data.lavalink.get_player_context(guild_id) else {
        return Ok(());
    };

    match component.data.custom_id.as_str() {
        "player:pause" => {
            let paused = player
                .get_player()
                .await
                .map(|p| p.paused)
                .unwrap_or(false);
            player.set_pause(!paused).await?;
        }
        "player:skip" => {
            player.skip()?;
        }
        "player:stop" => {
            manager::destroy(data, guild_id).await?;
        }
        other => {
            debug!("unknown control button '{}'", other);
        }
    }

    Ok(())
}

/// Whether the pressed message is one the bot treats as a control surface.
async fn is_control_surface(
    data: &Data,
    guild_id: serenity::GuildId,
    component: &serenity::ComponentInteraction,
) -> bool {
    if let Some(now_playing) = data.tracker.now_playing(guild_id) {
        if now_playing.message_id == component.message.id {
            return true;
        }
    }

    match data.db.get_setup(guild_id.get()).await {
        Ok(Some(setup)) => {
            setup.channel_id == component.channel_id.get()
                && setup.message_id == component.message.id.get()
        }
        Ok(None) => false,
        Err(e) => {
            debug!("setup lookup failed for guild {}: {}", guild_id, e);
            false
        }
    }
}
