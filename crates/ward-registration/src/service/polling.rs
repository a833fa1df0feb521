//! # Status Poll Discipline
//!
//! At most one registry poll is in flight per session. New requests while
//! one is outstanding are coalesced, and a newly issued poll supersedes any
//! still-pending one: completions carry the generation they were issued
//! under, and only a completion matching the current generation may touch
//! the session. Cancellation bumps the generation and is idempotent.

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct PollerState {
    generation: u64,
    in_flight: bool,
}

/// Issued for one poll; completions must present it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPermit {
    generation: u64,
}

/// Per-session poll coordinator.
#[derive(Debug, Default)]
pub struct StatusPoller {
    state: Mutex<PollerState>,
}

impl StatusPoller {
    /// Create an idle poller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a poll. Returns `None` when one is already in flight - the
    /// request is coalesced, not queued.
    pub fn begin(&self) -> Option<PollPermit> {
        let mut state = self.state.lock();
        if state.in_flight {
            return None;
        }
        state.in_flight = true;
        Some(PollPermit {
            generation: state.generation,
        })
    }

    /// Report a completed poll. Returns `true` when the result is current
    /// and may be applied; a superseded completion returns `false` and must
    /// be discarded without touching the session.
    pub fn complete(&self, permit: PollPermit) -> bool {
        let mut state = self.state.lock();
        if state.in_flight && state.generation == permit.generation {
            state.in_flight = false;
            true
        } else {
            false
        }
    }

    /// Cancel any outstanding poll. Best-effort: the network call itself may
    /// still finish, but its completion will no longer match. Idempotent -
    /// cancelling twice or after natural completion is a no-op beyond the
    /// generation bump.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        state.generation = state.generation.wrapping_add(1);
        state.in_flight = false;
    }

    /// Whether a poll is currently outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.state.lock().in_flight
    }
}
