//! Bot information command.

use crate::error::Result;
use crate::registry::{CommandDescriptor, CommandEntry};
use crate::types::{Context, Error};
use poise::serenity_prelude::{CreateEmbed, Permissions};

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: info(),
        descriptor: CommandDescriptor {
            name: "info".to_string(),
            aliases: Vec::new(),
            category: "general".to_string(),
            description_key: "cmd.info.description".to_string(),
            user_permissions: Permissions::empty(),
            slash: true,
            options: Vec::new(),
        },
    })
}

/// Show version, server count and uptime.
#[poise::command(slash_command, prefix_command, category = "general")]
pub async fn info(context: Context<'_>) -> std::result::Result<(), Error> {
    let data = context.data();
    let locale = data.guild_locale(context.guild_id()).await;
    let locale = locale.as_deref();

    let server_count = context.serenity_context().cache.guilds().len();
    let uptime_secs = data.started_at.elapsed().as_secs();
    let uptime = format!(
        "{}h {}m {}s",
        uptime_secs / 3600,
        (uptime_secs / 60) % 60,
        uptime_secs % 60
    );

    let embed = CreateEmbed::new()
        .title("Ferrotune")
        .field(
            data.i18n.translate("cmd.info.version", locale),
            env!("CARGO_PKG_VERSION"),
            true,
        )
        .field(
            data.i18n.translate("cmd.info.servers", locale),
            server_count.to_string(),
            true,
        )
        .field(data.i18n.translate("cmd.info.uptime", locale), uptime, true);

    context
        .send(poise::CreateReply::default().embed(embed))
        .await?;
    Ok(())
}
