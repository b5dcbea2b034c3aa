//! Player-panel management.

use crate::db::SetupRecord;
use crate::error::Result;
use crate::registry::{CommandDescriptor, CommandEntry, CommandOptionDescriptor};
use crate::setup::{control_row, panel_embed, PanelState};
use crate::types::{Context, Error};
use poise::serenity_prelude as serenity;
use serenity::{CommandOptionType, CreateMessage, Permissions};

pub fn entry() -> Result<CommandEntry> {
    Ok(CommandEntry {
        command: setup(),
        descriptor: CommandDescriptor {
            name: "setup".to_string(),
            aliases: Vec::new(),
            category: "settings".to_string(),
            description_key: "cmd.setup.description".to_string(),
            user_permissions: Permissions::MANAGE_GUILD,
            slash: true,
            options: vec![
                CommandOptionDescriptor {
                    kind: CommandOptionType::SubCommand,
                    name: "create".to_string(),
                    description_key: "cmd.setup.create.description".to_string(),
                    required: false,
                    options: Vec::new(),
                },
                CommandOptionDescriptor {
                    kind: CommandOptionType::SubCommand,
                    name: "remove".to_string(),
                    description_key: "cmd.setup.remove.description".to_string(),
                    required: false,
                    options: Vec::new(),
                },
            ],
        },
    })
}

/// Manage the persistent player panel.
#[poise::command(
    slash_command,
    prefix_command,
    category = "settings",
    guild_only,
    required_permissions = "MANAGE_GUILD",
    subcommands("create", "remove")
)]
pub async fn setup(context: Context<'_>) -> std::result::Result<(), Error> {
    // Only reachable by prefix without a subcommand
    let locale = context.data().guild_locale(context.guild_id()).await;
    context
        .say(
            context
                .data()
                .i18n
                .translate("cmd.setup.description", locale.as_deref()),
        )
        .await?;
    Ok(())
}

/// Post the panel message in the current channel and remember it.
#[poise::command(slash_command, prefix_command)]
pub async fn create(context: Context<'_>) -> std::result::Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        return Ok(());
    };
    let data = context.data();
    let locale = data.guild_locale(Some(guild_id)).await;
    let locale = locale.as_deref();

    let message = context
        .channel_id()
        .send_message(
            &context.serenity_context().http,
            CreateMessage::new()
                .embed(panel_embed(&data.i18n, locale, PanelState::Idle))
                .components(vec![control_row()]),
        )
        .await?;

    data.db
        .set_setup(
            guild_id.get(),
            Some(SetupRecord {
                channel_id: message.channel_id.get(),
                message_id: message.id.get(),
            }),
        )
        .await?;

    context
        .say(data.i18n.translate("cmd.setup.created", locale))
        .await?;
    Ok(())
}

/// Delete the panel message (best effort) and forget it.
#[poise::command(slash_command, prefix_command)]
pub async fn remove(context: Context<'_>) -> std::result::Result<(), Error> {
    let Some(guild_id) = context.guild_id() else {
        return Ok(());
    };
    let data = context.data();
    let locale = data.guild_locale(Some(guild_id)).await;
    let locale = locale.as_deref();

    let Some(record) = data.db.get_setup(guild_id.get()).await? else {
        context
            .say(data.i18n.translate("cmd.setup.missing", locale))
            .await?;
        return Ok(());
    };

    let _ = serenity::ChannelId::new(record.channel_id)
        .delete_message(
            &context.serenity_context().http,
            serenity::MessageId::new(record.message_id),
        )
        .await;

    data.db.set_setup(guild_id.get(), None).await?;

    context
        .say(data.i18n.translate("cmd.setup.removed", locale))
        .await?;
    Ok(())
}
