//! Pause playback.

use crate::error::Result;
use crate::registry::{CommandDescriptor, CommandEntry};
use crate::types::{Context, Error};
use poise::serenity_prelude::Permissions;

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: pause(),
        descriptor: CommandDescriptor {
            name: "pause".to_string(),
            aliases: Vec::new(),
            category: "music".to_string(),
            description_key: "cmd.pause.description".to_string(),
            user_permissions: Permissions::empty(),
            slash: true,
            options: Vec::new(),
        },
    })
}

/// Pause the current track.
#[poise::command(slash_command, prefix_command, category = "music", guild_only)]
pub async fn pause(context: Context<'_>) -> std::result::Result<(), Error> {
    let Some(player) = super::existing_player(&context).await? else {
        return Ok(());
    };

    player.set_pause(true).await?;

    let locale = context.data().guild_locale(context.guild_id()).await;
    context
        .say(
            context
                .data()
                .i18n
                .translate("cmd.pause.done", locale.as_deref()),
        )
        .await?;
    Ok(())
}
