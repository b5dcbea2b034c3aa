//! Resume playback.

use crate::error::Result;
use crate::registry::{CommandDescriptor, CommandEntry};
use crate::types::{Context, Error};
use poise::serenity_prelude::Permissions;

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: resume(),
        descriptor: CommandDescriptor {
            name: "resume".to_string(),
            aliases: vec!["unpause".to_string()],
            category: "music".to_string(),
            description_key: "cmd.resume.description".to_string(),
            user_permissions: Permissions::empty(),
            slash: true,
            options: Vec::new(),
        },
    })
}

/// Resume a paused track.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("unpause"),
    category = "music",
    guild_only
)]
pub async fn resume(context: Context<'_>) -> std::result::Result<(), Error> {
    let Some(player) = super::existing_player(&context).await? else {
        return Ok(());
    };

    player.set_pause(false).await?;

    let locale = context.data().guild_locale(context.guild_id()).await;
    context
        .say(
            context
                .data()
                .i18n
                .translate("cmd.resume.done", locale.as_deref()),
        )
        .await?;
    Ok(())
}
