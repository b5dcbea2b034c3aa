//! Event handlers and their dispatch plumbing.
//!
//! Every handler is registered against exactly one dispatch target: the chat
//! client, the player manager, or the node manager. Client events arrive
//! through poise's event hook and are matched by name; player and node events
//! arrive over the channels fed by the Lavalink hooks and are drained by two
//! dispatcher tasks.

pub mod client;
pub mod node;
pub mod player;

use crate::player::{NodeEvent, PlayerEvent};
use crate::registry::{EventFactory, NodeEventHandler, PlayerEventHandler};
use crate::types::{Data, Error};
use poise::serenity_prelude as serenity;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::error;

/// Every event handler the bot registers.
pub fn all() -> Vec<EventFactory> {
    vec![
        client::ready::binding,
        client::interaction_create::binding,
        client::voice_state_update::binding,
        player::track_start::binding,
        player::queue_end::binding,
        node::connected::binding,
        node::stats::binding,
    ]
}

/// Forward a chat-client event to every handler registered under its name.
///
/// Handler failures are logged and isolated; one broken handler never stops
/// the others or bubbles into the framework.
pub async fn dispatch_client(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> std::result::Result<(), Error> {
    for handler in &data.client_events {
        if handler.name == event.snake_case_name() {
            if let Err(e) = (handler.run)(ctx, event, data).await {
                error!("client event handler '{}' failed: {}", handler.name, e);
            }
        }
    }
    Ok(())
}

/// Spawn the dispatcher tasks draining the player and node event channels.
pub fn spawn_dispatchers(
    data: Data,
    ctx: serenity::Context,
    player_handlers: Vec<PlayerEventHandler>,
    node_handlers: Vec<NodeEventHandler>,
    mut player_rx: UnboundedReceiver<PlayerEvent>,
    mut node_rx: UnboundedReceiver<NodeEvent>,
) {
    {
        let data = data.clone();
        tokio::spawn(async move {
            while let Some(event) = player_rx.recv().await {
                for handler in &player_handlers {
                    if handler.name != event.name() {
                        continue;
                    }
                    if let Err(e) =
                        (handler.run)(data.clone(), ctx.clone(), event.clone()).await
                    {
                        error!("player event handler '{}' failed: {}", handler.name, e);
                    }
                }
            }
        });
    }

    tokio::spawn(async move {
        while let Some(event) = node_rx.recv().await {
            for handler in &node_handlers {
                if handler.name != event.name() {
                    continue;
                }
                if let Err(e) = (handler.run)(data.clone(), event.clone()).await {
                    error!("node event handler '{}' failed: {}", handler.name, e);
                }
            }
        }
    });
}
