//! Player-lifecycle event handlers.

pub mod queue_end;
pub mod track_start;
