//! Skip the current track.

use crate::error::Result;
use crate::registry::{CommandDescriptor, CommandEntry};
use crate::types::{Context, Error};
use poise::serenity_prelude::Permissions;

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: skip(),
        descriptor: CommandDescriptor {
            name: "skip".to_string(),
            aliases: vec!["s".to_string()],
            category: "music".to_string(),
            description_key: "cmd.skip.description".to_string(),
            user_permissions: Permissions::empty(),
            slash: true,
            options: Vec::new(),
        },
    })
}

/// Skip to the next queued track.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("s"),
    category = "music",
    guild_only
)]
pub async fn skip(context: Context<'_>) -> std::result::Result<(), Error> {
    let Some(player) = super::existing_player(&context).await? else {
        return Ok(());
    };

    player.skip()?;

    let locale = context.data().guild_locale(context.guild_id()).await;
    context
        .say(
            context
                .data()
                .i18n
                .translate("cmd.skip.done", locale.as_deref()),
        )
        .await?;
    Ok(())
}
