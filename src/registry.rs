//! Command and event registries.
//!
//! Commands and events are declared as lists of factories (`commands::all()`,
//! `events::all()`) and loaded once at startup. A factory that fails is
//! logged and skipped; loading always completes and reports how much of the
//! catalogue made it in. Commands are indexed by name and by every alias,
//! with last-write-wins semantics on collision.

use crate::error::Result;
use crate::player::{NodeEvent, PlayerEvent};
use crate::types::{Data, Error};
use futures::future::BoxFuture;
use poise::serenity_prelude as serenity;
use std::collections::HashMap;
use tracing::{error, warn};

/// Static description of a command, used for indexing and remote
/// registration. The executable half lives in the paired poise command.
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    pub name: String,
    pub aliases: Vec<String>,
    pub category: String,
    /// Translation key for the command description
    pub description_key: String,
    /// Permissions a member needs before the command is visible to them
    pub user_permissions: serenity::Permissions,
    /// Whether the command registers as a slash command
    pub slash: bool,
    pub options: Vec<CommandOptionDescriptor>,
}

/// One declared option, possibly carrying sub-options.
#[derive(Debug, Clone)]
pub struct CommandOptionDescriptor {
    pub kind: serenity::CommandOptionType,
    pub name: String,
    pub description_key: String,
    pub required: bool,
    pub options: Vec<CommandOptionDescriptor>,
}

/// A constructed command: dispatchable half plus its descriptor.
pub struct CommandEntry {
    pub command: poise::Command<Data, Error>,
    pub descriptor: CommandDescriptor,
}

/// Fallible command constructor.
pub type CommandFactory = fn() -> Result<CommandEntry>;

/// The loaded command catalogue.
pub struct CommandRegistry {
    commands: Vec<poise::Command<Data, Error>>,
    descriptors: Vec<CommandDescriptor>,
    names: HashMap<String, usize>,
    aliases: HashMap<String, String>,
    failed: usize,
}

impl CommandRegistry {
    /// Construct every factory, skipping and logging the ones that fail.
    pub fn load(factories: &[CommandFactory]) -> Self {
        let mut registry = CommandRegistry {
            commands: Vec::new(),
            descriptors: Vec::new(),
            names: HashMap::new(),
            aliases: HashMap::new(),
            failed: 0,
        };

        for factory in factories {
            match factory() {
                Ok(entry) => registry.insert(entry),
                Err(e) => {
                    error!("failed to load command: {}", e);
                    registry.failed += 1;
                }
            }
        }

        registry
    }

    fn insert(&mut self, entry: CommandEntry) {
        let name = entry.descriptor.name.clone();

        let slot = match self.names.get(&name) {
            Some(&slot) => {
                warn!("duplicate command name '{}', keeping the later one", name);
                self.commands[slot] = entry.command;
                self.descriptors[slot] = entry.descriptor;
                slot
            }
            None => {
                self.commands.push(entry.command);
                self.descriptors.push(entry.descriptor);
                let slot = self.descriptors.len() - 1;
                self.names.insert(name.clone(), slot);
                slot
            }
        };

        for alias in self.descriptors[slot].aliases.clone() {
            if let Some(previous) = self.aliases.insert(alias.clone(), name.clone()) {
                if previous != name {
                    warn!(
                        "alias '{}' moved from '{}' to '{}'",
                        alias, previous, name
                    );
                }
            }
        }
    }

    /// How many commands loaded.
    pub fn loaded(&self) -> usize {
        self.descriptors.len()
    }

    /// How many factories failed.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Resolve a name or alias to its descriptor.
    pub fn resolve(&self, query: &str) -> Option<&CommandDescriptor> {
        let name = self.aliases.get(query).map(String::as_str).unwrap_or(query);
        self.names.get(name).map(|&slot| &self.descriptors[slot])
    }

    /// Split into the dispatchable commands and the lookup index.
    pub fn split(self) -> (Vec<poise::Command<Data, Error>>, CommandIndex) {
        (
            self.commands,
            CommandIndex {
                descriptors: self.descriptors,
                names: self.names,
                aliases: self.aliases,
            },
        )
    }
}

/// Name/alias index over the loaded descriptors, kept for the lifetime of the
/// process.
pub struct CommandIndex {
    pub descriptors: Vec<CommandDescriptor>,
    names: HashMap<String, usize>,
    aliases: HashMap<String, String>,
}

impl CommandIndex {
    /// Resolve a name or alias to its descriptor.
    pub fn resolve(&self, query: &str) -> Option<&CommandDescriptor> {
        let name = self.aliases.get(query).map(String::as_str).unwrap_or(query);
        self.names.get(name).map(|&slot| &self.descriptors[slot])
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Handler for a chat-client event, keyed by the event's snake_case name.
pub struct ClientEventHandler {
    pub name: &'static str,
    pub run: for<'a> fn(
        &'a serenity::Context,
        &'a serenity::FullEvent,
        &'a Data,
    ) -> BoxFuture<'a, Result<()>>,
}

/// Handler for a player-lifecycle event.
pub struct PlayerEventHandler {
    pub name: &'static str,
    pub run: fn(Data, serenity::Context, PlayerEvent) -> BoxFuture<'static, Result<()>>,
}

/// Handler for a node-manager event.
pub struct NodeEventHandler {
    pub name: &'static str,
    pub run: fn(Data, NodeEvent) -> BoxFuture<'static, Result<()>>,
}

/// An event handler bound to exactly one dispatch target.
pub enum EventBinding {
    Client(ClientEventHandler),
    Player(PlayerEventHandler),
    Node(NodeEventHandler),
}

/// Fallible event constructor.
pub type EventFactory = fn() -> Result<EventBinding>;

/// The loaded event catalogue, split by dispatch target.
pub struct EventRegistry {
    pub client: Vec<ClientEventHandler>,
    pub player: Vec<PlayerEventHandler>,
    pub node: Vec<NodeEventHandler>,
    failed: usize,
}

impl EventRegistry {
    /// Construct every factory, skipping and logging the ones that fail.
    pub fn load(factories: &[EventFactory]) -> Self {
        let mut registry = EventRegistry {
            client: Vec::new(),
            player: Vec::new(),
            node: Vec::new(),
            failed: 0,
        };

        for factory in factories {
            match factory() {
                Ok(EventBinding::Client(handler)) => registry.client.push(handler),
                Ok(EventBinding::Player(handler)) => registry.player.push(handler),
                Ok(EventBinding::Node(handler)) => registry.node.push(handler),
                Err(e) => {
                    error!("failed to load event handler: {}", e);
                    registry.failed += 1;
                }
            }
        }

        registry
    }

    /// How many handlers loaded, across all targets.
    pub fn loaded(&self) -> usize {
        self.client.len() + self.player.len() + self.node.len()
    }

    /// How many factories failed.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Split into the three handler lists.
    pub fn split(
        self,
    ) -> (
        Vec<ClientEventHandler>,
        Vec<PlayerEventHandler>,
        Vec<NodeEventHandler>,
    ) {
        (self.client, self.player, self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FerrotuneError;
    use crate::types::Context;

    #[poise::command(slash_command)]
    async fn noop(_context: Context<'_>) -> std::result::Result<(), Error> {
        Ok(())
    }

    fn descriptor(name: &str, aliases: &[&str]) -> CommandDescriptor {
        CommandDescriptor {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            category: "test".to_string(),
            description_key: format!("cmd.{}.description", name),
            user_permissions: serenity::Permissions::empty(),
            slash: true,
            options: Vec::new(),
        }
    }

    fn entry(name: &'static str, aliases: &'static [&'static str]) -> Result<CommandEntry> {
        let mut command = noop();
        command.name = name.to_string();
        Ok(CommandEntry {
            command,
            descriptor: descriptor(name, aliases),
        })
    }

    fn ok_a() -> Result<CommandEntry> {
        entry("alpha", &["a"])
    }
    fn ok_b() -> Result<CommandEntry> {
        entry("beta", &["b"])
    }
    fn ok_c() -> Result<CommandEntry> {
        entry("gamma", &[])
    }
    fn ok_d() -> Result<CommandEntry> {
        entry("delta", &[])
    }
    fn broken() -> Result<CommandEntry> {
        Err(FerrotuneError::Registry("construction exploded".to_string()))
    }
    fn alias_thief() -> Result<CommandEntry> {
        entry("epsilon", &["a"])
    }

    #[test]
    fn test_partial_failure_loads_the_rest() {
        let factories: Vec<CommandFactory> = vec![ok_a, ok_b, broken, ok_c, ok_d];
        let registry = CommandRegistry::load(&factories);

        assert_eq!(registry.loaded(), 4);
        assert_eq!(registry.failed(), 1);
        assert!(registry.resolve("alpha").is_some());
        assert!(registry.resolve("delta").is_some());
    }

    #[test]
    fn test_alias_resolves_to_command() {
        let factories: Vec<CommandFactory> = vec![ok_a];
        let registry = CommandRegistry::load(&factories);

        assert_eq!(registry.resolve("a").unwrap().name, "alpha");
        assert_eq!(registry.resolve("alpha").unwrap().name, "alpha");
        assert!(registry.resolve("missing").is_none());
    }

    #[test]
    fn test_alias_collision_last_write_wins() {
        let factories: Vec<CommandFactory> = vec![ok_a, alias_thief];
        let registry = CommandRegistry::load(&factories);

        assert_eq!(registry.loaded(), 2);
        assert_eq!(registry.resolve("a").unwrap().name, "epsilon");
    }

    #[test]
    fn test_name_collision_replaces_earlier_entry() {
        fn first() -> Result<CommandEntry> {
            let mut e = entry("dup", &[])?;
            e.descriptor.category = "first".to_string();
            Ok(e)
        }
        fn second() -> Result<CommandEntry> {
            let mut e = entry("dup", &[])?;
            e.descriptor.category = "second".to_string();
            Ok(e)
        }

        let factories: Vec<CommandFactory> = vec![first, second];
        let registry = CommandRegistry::load(&factories);

        assert_eq!(registry.loaded(), 1);
        assert_eq!(registry.resolve("dup").unwrap().category, "second");
    }

    #[test]
    fn test_event_registry_partial_failure_and_targets() {
        fn client_binding() -> Result<EventBinding> {
            Ok(EventBinding::Client(ClientEventHandler {
                name: "ready",
                run: |_, _, _| Box::pin(async { Ok(()) }),
            }))
        }
        fn player_binding() -> Result<EventBinding> {
            Ok(EventBinding::Player(PlayerEventHandler {
                name: "queue_end",
                run: |_, _, _| Box::pin(async { Ok(()) }),
            }))
        }
        fn node_binding() -> Result<EventBinding> {
            Ok(EventBinding::Node(NodeEventHandler {
                name: "connected",
                run: |_, _| Box::pin(async { Ok(()) }),
            }))
        }
        fn broken_binding() -> Result<EventBinding> {
            Err(FerrotuneError::Registry("bad event".to_string()))
        }

        let factories: Vec<EventFactory> =
            vec![client_binding, player_binding, node_binding, broken_binding];
        let registry = EventRegistry::load(&factories);

        assert_eq!(registry.loaded(), 3);
        assert_eq!(registry.failed(), 1);
        assert_eq!(registry.client.len(), 1);
        assert_eq!(registry.player.len(), 1);
        assert_eq!(registry.node.len(), 1);
    }
}
