//! Node connectivity logging.

use crate::error::Result;
use crate::player::NodeEvent;
use crate::registry::{EventBinding, NodeEventHandler};
use crate::types::Data;
use tracing::info;

pub fn binding() -> Result<EventBinding> {
    Ok(EventBinding::Node(NodeEventHandler {
        name: "connected",
        run: |data, event| Box::pin(run(data, event)),
    }))
}

async fn run(_data: Data, event: NodeEvent) -> Result<()> {
    let NodeEvent::Connected {
        session_id,
        resumed,
    } = event
    else {
        return Ok(());
    };

    if resumed {
        info!("audio node resumed session {}", session_id);
    } else {
        info!("audio node connected with session {}", session_id);
    }
    Ok(())
}
