//! The energy-reset broadcast.
//!
//! A reset is a payload-free event that every subscribed agent must observe.
//! The broadcaster is a cloneable handle over a shared generation counter:
//! requesting a reset bumps the counter, and each subscription notices the
//! change the next time its owner polls.  Requests never block, are never
//! lost, and any number of requests between two polls collapse into a
//! single refill.
//!
//! Handles can be moved to other threads (a UI thread, a network handler)
//! while the agents keep polling from the tick loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sender side of the reset event.  Owned by the world/session; clones share
/// the same channel.
#[derive(Debug, Clone, Default)]
pub struct ResetBroadcaster {
    generation: Arc<AtomicU64>,
}

impl ResetBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the reset event for every subscriber.
    pub fn request_reset(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!("energy reset requested (generation {generation})");
    }

    /// Number of resets requested so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// A subscription that will observe resets requested from now on.
    pub fn subscribe(&self) -> ResetSubscription {
        ResetSubscription {
            source: Arc::clone(&self.generation),
            seen:   self.generation(),
        }
    }
}

/// Receiver side held by one agent.
#[derive(Debug)]
pub struct ResetSubscription {
    source: Arc<AtomicU64>,
    seen:   u64,
}

impl ResetSubscription {
    /// `true` if at least one reset was requested since the previous poll.
    pub fn poll(&mut self) -> bool {
        let now = self.source.load(Ordering::Acquire);
        if now != self.seen {
            self.seen = now;
            true
        } else {
            false
        }
    }
}
