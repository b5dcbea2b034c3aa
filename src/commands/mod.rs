//! Discord bot commands.
//!
//! This module contains all available bot commands organized by category.
//! Every command registers through a factory listed in [`all`].

pub mod general;
pub mod music;
pub mod settings;

use crate::registry::CommandFactory;

/// The full command catalogue.
pub fn all() -> Vec<CommandFactory> {
    vec![
        general::ping::entry,
        general::info::entry,
        music::play::entry,
        music::skip::entry,
        music::pause::entry,
        music::resume::entry,
        music::stop::entry,
        music::nowplaying::entry,
        settings::language::entry,
        settings::setup::entry,
        settings::stay::entry,
    ]
}
