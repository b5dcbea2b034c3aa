//! Show the current track.

use crate::error::Result;
use crate::player::manager;
use crate::registry::{CommandDescriptor, CommandEntry};
use crate::setup;
use crate::types::{Context, Error};
use poise::serenity_prelude::Permissions;

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: nowplaying(),
        descriptor: CommandDescriptor {
            name: "nowplaying".to_string(),
            aliases: vec!["np".to_string()],
            category: "music".to_string(),
            description_key: "cmd.nowplaying.description".to_string(),
            user_permissions: Permissions::empty(),
            slash: true,
            options: Vec::new(),
        },
    })
}

/// Show what is playing right now.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("np"),
    category = "music",
    guild_only
)]
pub async fn nowplaying(context: Context<'_>) -> std::result::Result<(), Error> {
    let Some(player) = super::existing_player(&context).await? else {
        return Ok(());
    };

    let data = context.data();
    let locale = data.guild_locale(context.guild_id()).await;
    let locale = locale.as_deref();

    let current = player.get_player().await?;
    let Some(track) = current.track else {
        context
            .say(data.i18n.translate("player.nothing_playing", locale))
            .await?;
        return Ok(());
    };

    let summary = manager::summarize(&track);
    let embed = setup::now_playing_embed(&data.i18n, locale, &summary);
    context
        .send(poise::CreateReply::default().embed(embed))
        .await?;
    Ok(())
}
