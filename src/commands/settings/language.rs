//! Guild language configuration.

use crate::error::Result;
use crate::registry::{CommandDescriptor, CommandEntry, CommandOptionDescriptor};
use crate::types::{Context, Error};
use poise::serenity_prelude::{CommandOptionType, Permissions};

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: language(),
        descriptor: CommandDescriptor {
            name: "language".to_string(),
            aliases: vec!["lang".to_string()],
            category: "settings".to_string(),
            description_key: "cmd.language.description".to_string(),
            user_permissions: Permissions::MANAGE_GUILD,
            slash: true,
            options: vec![CommandOptionDescriptor {
                kind: CommandOptionType::String,
                name: "locale".to_string(),
                description_key: "cmd.language.options.locale".to_string(),
                required: true,
                options: Vec::new(),
            }],
        },
    })
}

/// Set the locale replies use in this server.
#[poise::command(
    slash_command,
    prefix_command,
    aliases("lang"),
    category = "settings",
    guild_only,
    required_permissions = "MANAGE_GUILD"
)]
pub async fn language(
    context: Context<'_>,
    #[description = "Locale code, e.g. en or es-ES"] locale: String,
) -> std::result::Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        return Ok(());
    };
    let data = context.data();

    if !data.i18n.has_locale(&locale) {
        let current = data.guild_locale(Some(guild_id)).await;
        let reply = data
            .i18n
            .translate("cmd.language.unknown", current.as_deref())
            .replace("{locale}", &locale)
            .replace("{locales}", &data.i18n.locales().join(", "));
        context.say(reply).await?;
        return Ok(());
    }

    data.db.set_language(guild_id.get(), &locale).await?;

    let reply = data
        .i18n
        .translate("cmd.language.done", Some(&locale))
        .replace("{locale}", &locale);
    context.say(reply).await?;
    Ok(())
}
