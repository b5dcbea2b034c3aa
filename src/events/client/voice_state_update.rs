//! Voice-state changes: clean up after a forced disconnect.

use crate::error::Result;
use crate::player::manager;
use crate::registry::{ClientEventHandler, EventBinding};
use crate::types::Data;
use poise::serenity_prelude as serenity;
use tracing::info;

pub fn binding() -> Result<EventBinding> {
    Ok(EventBinding::Client(ClientEventHandler {
        name: "voice_state_update",
        run: |ctx, event, data| Box::pin(run(ctx, event, data)),
    }))
}

async fn run(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &Data,
) -> Result<()> {
    let serenity::FullEvent::VoiceStateUpdate { old: _, new } = event else {
        return Ok(());
    };

    let bot_id = ctx.cache.current_user().id;
    if new.user_id != bot_id || new.channel_id.is_some() {
        return Ok(());
    }
    let Some(guild_id) = new.guild_id else {
        return Ok(());
    };

    // Someone (or something) pulled the bot out of voice; drop the session
    if data.lavalink.get_player_context(guild_id).is_some() {
        info!("voice session ended in guild {}, cleaning up player", guild_id);
        manager::destroy(data, guild_id).await?;
    }

    Ok(())
}
