//! Periodic node statistics.

use crate::error::Result;
use crate::player::NodeEvent;
use crate::registry::{EventBinding, NodeEventHandler};
use crate::types::Data;
use tracing::debug;

pub fn binding() -> Result<EventBinding> {
    Ok(EventBinding::Node(NodeEventHandler {
        name: "stats",
        run: |data, event| Box::pin(run(data, event)),
    }))
}

async fn run(_data: Data, event: NodeEvent) -> Result<()> {
    let NodeEvent::Stats {
        players,
        playing_players,
        uptime_ms,
    } = event
    else {
        return Ok(());
    };

    debug!(
        "node stats: {} players ({} playing), up {}s",
        players,
        playing_players,
        uptime_ms / 1000
    );
    Ok(())
}
