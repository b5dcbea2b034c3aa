//! Per-player side records.
//!
//! A typed replacement for stashing correlation data in an untyped per-player
//! bag: each guild's player gets one record holding the now-playing message
//! reference and the idle-timer handle. At most one idle timer exists per
//! player; arming a new one cancels and replaces the previous handle under
//! the same lock.

use poise::serenity_prelude as serenity;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

/// Location of the most recent now-playing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NowPlayingRef {
    pub channel_id: serenity::ChannelId,
    pub message_id: serenity::MessageId,
}

#[derive(Default)]
struct PlayerMeta {
    now_playing: Option<NowPlayingRef>,
    idle_timer: Option<JoinHandle<()>>,
}

/// Registry of per-player side records, keyed by guild.
#[derive(Default)]
pub struct PlayerTracker {
    inner: Mutex<HashMap<serenity::GuildId, PlayerMeta>>,
}

impl PlayerTracker {
    fn lock(&self) -> MutexGuard<'_, HashMap<serenity::GuildId, PlayerMeta>> {
        // A poisoned lock only means a panic mid-update; the map stays usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record (or clear) the now-playing message for a guild's player.
    pub fn set_now_playing(&self, guild_id: serenity::GuildId, message: Option<NowPlayingRef>) {
        self.lock().entry(guild_id).or_default().now_playing = message;
    }

    /// Take the recorded now-playing message, leaving none.
    pub fn take_now_playing(&self, guild_id: serenity::GuildId) -> Option<NowPlayingRef> {
        self.lock()
            .get_mut(&guild_id)
            .and_then(|meta| meta.now_playing.take())
    }

    /// The recorded now-playing message, if any.
    pub fn now_playing(&self, guild_id: serenity::GuildId) -> Option<NowPlayingRef> {
        self.lock().get(&guild_id).and_then(|meta| meta.now_playing)
    }

    /// Arm the idle timer for a guild's player, cancelling any previous one.
    pub fn arm_idle(&self, guild_id: serenity::GuildId, handle: JoinHandle<()>) {
        let mut inner = self.lock();
        if let Some(old) = inner.entry(guild_id).or_default().idle_timer.replace(handle) {
            old.abort();
        }
    }

    /// Cancel the idle timer for a guild's player, if one is armed.
    pub fn disarm_idle(&self, guild_id: serenity::GuildId) {
        let mut inner = self.lock();
        if let Some(handle) = inner.get_mut(&guild_id).and_then(|meta| meta.idle_timer.take()) {
            handle.abort();
        }
    }

    /// Whether an idle timer is currently armed.
    pub fn has_idle_timer(&self, guild_id: serenity::GuildId) -> bool {
        self.lock()
            .get(&guild_id)
            .map(|meta| meta.idle_timer.is_some())
            .unwrap_or(false)
    }

    /// Drop a player's record entirely, cancelling any armed timer.
    pub fn remove(&self, guild_id: serenity::GuildId) {
        if let Some(meta) = self.lock().remove(&guild_id) {
            if let Some(handle) = meta.idle_timer {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn guild(n: u64) -> serenity::GuildId {
        serenity::GuildId::new(n)
    }

    #[test]
    fn test_now_playing_roundtrip() {
        let tracker = PlayerTracker::default();
        let reference = NowPlayingRef {
            channel_id: serenity::ChannelId::new(1),
            message_id: serenity::MessageId::new(2),
        };

        assert_eq!(tracker.now_playing(guild(1)), None);
        tracker.set_now_playing(guild(1), Some(reference));
        assert_eq!(tracker.now_playing(guild(1)), Some(reference));
        assert_eq!(tracker.take_now_playing(guild(1)), Some(reference));
        assert_eq!(tracker.take_now_playing(guild(1)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_arming_replaces_previous_timer() {
        let tracker = PlayerTracker::default();
        let first_fired = Arc::new(AtomicBool::new(false));
        let second_fired = Arc::new(AtomicBool::new(false));

        let fired = first_fired.clone();
        let first = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            fired.store(true, Ordering::SeqCst);
        });
        tracker.arm_idle(guild(1), first);

        let fired = second_fired.clone();
        let second = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            fired.store(true, Ordering::SeqCst);
        });
        tracker.arm_idle(guild(1), second);
        assert!(tracker.has_idle_timer(guild(1)));

        tokio::time::sleep(Duration::from_secs(10)).await;
        // Yield so the timer tasks get to run
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(!first_fired.load(Ordering::SeqCst));
        assert!(second_fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_prevents_fire() {
        let tracker = PlayerTracker::default();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            flag.store(true, Ordering::SeqCst);
        });
        tracker.arm_idle(guild(1), handle);
        tracker.disarm_idle(guild(1));
        assert!(!tracker.has_idle_timer(guild(1)));

        tokio::time::sleep(Duration::from_secs(10)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_cancels_timer_and_clears_record() {
        let tracker = PlayerTracker::default();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            flag.store(true, Ordering::SeqCst);
        });
        tracker.arm_idle(guild(1), handle);
        tracker.set_now_playing(
            guild(1),
            Some(NowPlayingRef {
                channel_id: serenity::ChannelId::new(1),
                message_id: serenity::MessageId::new(2),
            }),
        );

        tracker.remove(guild(1));
        assert!(!tracker.has_idle_timer(guild(1)));
        assert_eq!(tracker.now_playing(guild(1)), None);

        tokio::time::sleep(Duration::from_secs(10)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!fired.load(Ordering::SeqCst));
    }
}
