//! Ready event: deploy commands and report stats once connected.

use crate::error::Result;
use crate::registry::{ClientEventHandler, EventBinding};
use crate::stats;
use crate::sync::{self, SyncMode, SyncScope};
use crate::types::Data;
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

pub fn binding() -> Result<EventBinding> {
    Ok(EventBinding::Client(ClientEventHandler {
        name: "ready",
        run: |ctx, event, data| Box::pin(run(ctx, event, data)),
    }))
}

async fn run(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    data: &Data,
) -> Result<()> {
    let serenity::FullEvent::Ready { data_about_bot } = event else {
        return Ok(());
    };

    info!("{} is connected to Discord", data_about_bot.user.name);
    ctx.set_activity(Some(serenity::ActivityData::listening("/play")));

    let scope = match data.config.guild_id {
        Some(id) => SyncScope::Guild(serenity::GuildId::new(id)),
        None => SyncScope::Global,
    };
    sync::sync_commands(
        &ctx.http,
        &data.i18n,
        &data.commands.descriptors,
        scope,
        SyncMode::Deploy,
    )
    .await?;

    if let Some(token) = &data.config.topgg_token {
        let server_count = ctx.cache.guilds().len();
        if let Err(e) = stats::post_server_count(
            &data.http_client,
            token,
            data_about_bot.user.id.get(),
            server_count,
        )
        .await
        {
            warn!("failed to report server count: {}", e);
        }
    }

    Ok(())
}
