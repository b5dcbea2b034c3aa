//! The idle/auto-leave decision.
//!
//! When a player's queue runs dry it either stays put, leaves immediately, or
//! arms a grace timer. The decision is a pure function of the configured
//! window so the state machine can be tested without a live player.

use std::time::Duration;

/// What to do when the queue has just ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleAction {
    /// Auto-leave is disabled; remain in the channel indefinitely.
    Stay,
    /// Leave the voice channel right now, no timer.
    DisconnectNow,
    /// Arm a timer and leave when it fires, unless playback resumed.
    ArmTimer(Duration),
}

/// Map an idle window to the action to take. Negative values are the
/// "disabled" sentinel.
pub fn idle_action(window_secs: i64) -> IdleAction {
    if window_secs < 0 {
        IdleAction::Stay
    } else if window_secs == 0 {
        IdleAction::DisconnectNow
    } else {
        IdleAction::ArmTimer(Duration::from_secs(window_secs as u64))
    }
}

/// The idle window in effect for a guild: its override if set, otherwise the
/// process-wide default.
pub fn effective_window(guild_override: Option<i64>, default_secs: i64) -> i64 {
    guild_override.unwrap_or(default_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_window_never_disconnects() {
        assert_eq!(idle_action(-1), IdleAction::Stay);
        assert_eq!(idle_action(-300), IdleAction::Stay);
    }

    #[test]
    fn test_zero_window_disconnects_immediately() {
        assert_eq!(idle_action(0), IdleAction::DisconnectNow);
    }

    #[test]
    fn test_positive_window_arms_timer() {
        assert_eq!(
            idle_action(60),
            IdleAction::ArmTimer(Duration::from_secs(60))
        );
        assert_eq!(idle_action(1), IdleAction::ArmTimer(Duration::from_secs(1)));
    }

    #[test]
    fn test_effective_window_prefers_guild_override() {
        assert_eq!(effective_window(Some(0), 60), 0);
        assert_eq!(effective_window(Some(-1), 60), -1);
        assert_eq!(effective_window(Some(120), 60), 120);
        assert_eq!(effective_window(None, 60), 60);
    }
}
