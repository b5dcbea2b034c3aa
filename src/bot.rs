//! Bot startup and wiring.

use crate::commands;
use crate::config::Config;
use crate::db;
use crate::error::{FerrotuneError, Result};
use crate::events;
use crate::i18n::I18n;
use crate::player::{self, EventSink, PlayerTracker};
use crate::registry::{CommandRegistry, EventRegistry};
use crate::shutdown;
use crate::types::{App, Data, Error};
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use songbird::SerenityInit;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{error, info};

pub async fn run() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    shutdown::install_panic_hook();

    let config = Config::from_env()?;

    // Backend selection and connection; failures here are fatal
    let store = db::connect(config.database_url.as_deref()).await?;

    let i18n = I18n::load()?;

    let command_registry = CommandRegistry::load(&commands::all());
    info!(
        "loaded {} commands ({} failed)",
        command_registry.loaded(),
        command_registry.failed()
    );
    let (framework_commands, command_index) = command_registry.split();

    let event_registry = EventRegistry::load(&events::all());
    info!(
        "loaded {} event handlers ({} failed)",
        event_registry.loaded(),
        event_registry.failed()
    );

    let (player_tx, player_rx) = mpsc::unbounded_channel();
    let (node_tx, node_rx) = mpsc::unbounded_channel();

    let token = config.token.clone();
    let prefix = config.prefix.clone();
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: framework_commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::dispatch_client(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |context, ready, _framework| {
            Box::pin(async move {
                let songbird = songbird::get(context).await.ok_or_else(|| {
                    FerrotuneError::Discord("voice client is not registered".to_string())
                })?;

                let lavalink = player::manager::connect(
                    &config,
                    ready.user.id,
                    EventSink {
                        player: player_tx,
                        node: node_tx,
                    },
                )
                .await;

                let (client_events, player_events, node_events) = event_registry.split();

                let app: Data = Arc::new(App {
                    config,
                    db: store,
                    i18n,
                    http_client: reqwest::Client::new(),
                    lavalink,
                    songbird,
                    tracker: PlayerTracker::default(),
                    commands: command_index,
                    client_events,
                    started_at: Instant::now(),
                });

                events::spawn_dispatchers(
                    app.clone(),
                    context.clone(),
                    player_events,
                    node_events,
                    player_rx,
                    node_rx,
                );

                Ok(app)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .register_songbird()
        .await?;

    shutdown::install_signal_handlers(client.shard_manager.clone());

    client.start().await?;

    Ok(())
}

async fn on_error(err: poise::FrameworkError<'_, Data, Error>) {
    match err {
        poise::FrameworkError::Setup { error, .. } => {
            error!("failed to initialize bot: {}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "command '{}' failed: {}",
                ctx.command().qualified_name,
                error
            );
            let locale = ctx.data().guild_locale(ctx.guild_id()).await;
            let _ = ctx
                .say(ctx.data().i18n.translate("error.command", locale.as_deref()))
                .await;
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("error while handling command error: {}", e);
            }
        }
    }
}
