//! Playback commands.

pub mod nowplaying;
pub mod pause;
pub mod play;
pub mod resume;
pub mod skip;
pub mod stop;

use crate::types::Context;
use lavalink_rs::prelude::PlayerContext;

/// The guild's player context, replying with the standard notice when there
/// is no active player.
pub(crate) async fn existing_player(
    context: &Context<'_>,
) -> crate::error::Result<Option<PlayerContext>> {
    let Some(guild_id) = context.guild_id() else {
        return Ok(None);
    };
    match context.data().lavalink.get_player_context(guild_id) {
        Some(player) => Ok(Some(player)),
        None => {
            let locale = context.data().guild_locale(Some(guild_id)).await;
            context
                .say(
                    context
                        .data()
                        .i18n
                        .translate("player.nothing_playing", locale.as_deref()),
                )
                .await?;
            Ok(None)
        }
    }
}
