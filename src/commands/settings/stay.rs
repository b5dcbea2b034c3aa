//! 24/7 mode toggle.

use crate::error::Result;
use crate::registry::{CommandDescriptor, CommandEntry};
use crate::types::{Context, Error};
use poise::serenity_prelude::Permissions;

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: stay(),
        descriptor: CommandDescriptor {
            name: "stay".to_string(),
            aliases: vec!["247".to_string()],
            category: "settings".to_string(),
            description_key: "cmd.stay.description".to_string(),
            user_permissions: Permissions::MANAGE_GUILD,
            slash: true,
            options: Vec::new(),
        },
    })
}

/// Toggle whether the bot stays in voice after the queue ends.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("247"),
    category = "settings",
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn stay(context: Context<'_>) -> std::result::Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        return Ok(());
    };
    let data = context.data();

    let settings = data.db.get_settings(guild_id.get()).await?;
    let enable = !settings.stay;
    data.db.set_stay(guild_id.get(), enable).await?;

    let locale = settings.language.as_deref();
    let key = if enable {
        "cmd.stay.enabled"
    } else {
        "cmd.stay.disabled"
    };
    context.say(data.i18n.translate(key, locale)).await?;
    Ok(())
}
