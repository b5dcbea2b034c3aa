//! Chat-client event handlers.

pub mod interaction_create;
pub mod ready;
pub mod voice_state_update;
