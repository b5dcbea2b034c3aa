//! Ping command for bot health check.

use crate::error::Result;
use crate::registry::{CommandDescriptor, CommandEntry};
use crate::types::{Context, Error};
use poise::serenity_prelude::Permissions;

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: ping(),
        descriptor: CommandDescriptor {
            name: "ping".to_string(),
            aliases: Vec::new(),
            category: "general".to_string(),
            description_key: "cmd.ping.description".to_string(),
            user_permissions: Permissions::empty(),
            slash: true,
            options: Vec::new(),
        },
    })
}

/// Simple ping command to check if the bot is responsive.
#[poise::command(slash_command, prefix_command, category = "general")]
pub async fn ping(context: Context<'_>) -> std::result::Result<(), Error> {
    let latency = context.ping().await;
    let locale = context.data().guild_locale(context.guild_id()).await;
    let reply = context
        .data()
        .i18n
        .translate("cmd.ping.response", locale.as_deref())
        .replace("{ms}", &latency.as_millis().to_string());
    context.say(reply).await?;
    Ok(())
}
