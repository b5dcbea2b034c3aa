//! Process-level safety net.
//!
//! Panics anywhere in the process are logged and, when they happen inside a
//! task, do not take the process down. Termination signals share one
//! idempotent shutdown path: disconnect from the gateway, then exit 0.

use poise::serenity_prelude as serenity;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

/// Install a panic hook that logs instead of only printing to stderr.
///
/// Tokio isolates panics to the task they happen in, so a logged panic in a
/// handler leaves the rest of the bot running.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        error!("panic: {}", info);
    }));
}

/// Returns `true` exactly once per flag: the caller that flips it owns the
/// shutdown.
fn begin(flag: &AtomicBool) -> bool {
    !flag.swap(true, Ordering::SeqCst)
}

/// Install the termination-signal handler.
///
/// The first SIGINT/SIGTERM/SIGQUIT triggers a single best-effort gateway
/// disconnect and a clean exit; repeated signals while shutdown is underway
/// are ignored.
pub fn install_signal_handlers(shard_manager: Arc<serenity::ShardManager>) {
    tokio::spawn(async move {
        let shutting_down = AtomicBool::new(false);

        loop {
            wait_for_termination().await;
            if !begin(&shutting_down) {
                continue;
            }

            info!("disconnecting from Discord...");
            shard_manager.shutdown_all().await;
            info!("successfully disconnected from Discord");
            std::process::exit(0);
        }
    });
}

#[cfg(unix)]
async fn wait_for_termination() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to install SIGINT handler: {}", e);
            return std::future::pending().await;
        }
    };
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to install SIGTERM handler: {}", e);
            return std::future::pending().await;
        }
    };
    let mut quit = match signal(SignalKind::quit()) {
        Ok(s) => s,
        Err(e) => {
            error!("failed to install SIGQUIT handler: {}", e);
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = interrupt.recv() => {}
        _ = terminate.recv() => {}
        _ = quit.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to wait for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_begins_exactly_once() {
        let flag = AtomicBool::new(false);
        assert!(begin(&flag));
        // A rapid second signal must not start a second shutdown
        assert!(!begin(&flag));
        assert!(!begin(&flag));
    }
}
