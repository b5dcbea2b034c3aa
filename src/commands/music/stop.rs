//! Stop playback and leave the voice channel.

use crate::error::Result;
use crate::player::manager;
use crate::registry::{CommandDescriptor, CommandEntry};
use crate::types::{Context, Error};
use poise::serenity_prelude::Permissions;

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: stop(),
        descriptor: CommandDescriptor {
            name: "stop".to_string(),
            aliases: vec!["leave".to_string(), "dc".to_string()],
            category: "music".to_string(),
            description_key: "cmd.stop.description".to_string(),
            user_permissions: Permissions::empty(),
            slash: true,
            options: Vec::new(),
        },
    })
}

/// Tear down the player and disconnect.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("leave", "dc"),
    category = "music",
    guild_only
)]
pub async fn stop(context: Context<'_>) -> std::result::Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        return Ok(());
    };
    if super::existing_player(&context).await?.is_none() {
        return Ok(());
    }

    manager::destroy(context.data(), guild_id).await?;

    let locale = context.data().guild_locale(Some(guild_id)).await;
    context
        .say(
            context
                .data()
                .i18n
                .translate("cmd.stop.done", locale.as_deref()),
        )
        .await?;
    Ok(())
}
