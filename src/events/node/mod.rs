//! Node-manager event handlers.

pub mod connected;
pub mod stats;
