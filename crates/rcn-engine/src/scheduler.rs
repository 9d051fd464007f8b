//! Playback cursor bookkeeping.
//!
//! The scheduler decides where on the device timeline the next block lands.
//! It never synthesizes anything itself; [`Engine`](crate::Engine) asks it
//! for a start time, renders, then commits.

use rcn_ir::timing::{BLOCK_DURATION, LATENCY, STARVATION_THRESHOLD};
use tracing::trace;

/// Result of advancing the scheduler to a new device time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Advance {
    /// Updates stopped arriving for `gap` seconds. The cursor was reset to
    /// the current time and nothing should be rendered this call.
    Starved { gap: f64 },
    /// Render one block starting at `start_time`, then [`commit`](Scheduler::commit).
    Ready { start_time: f64 },
}

/// Monotonic playback cursor plus starvation tracking.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    playback_cursor: f64,
    last_update_time: f64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device time at which the next block begins.
    pub fn playback_cursor(&self) -> f64 {
        self.playback_cursor
    }

    /// Device time of the last accepted update.
    pub fn last_update_time(&self) -> f64 {
        self.last_update_time
    }

    /// Account for an update at device time `now`.
    pub fn advance(&mut self, now: f64) -> Advance {
        let gap = now - self.last_update_time;
        self.last_update_time = now;

        if gap > STARVATION_THRESHOLD {
            // Do not build a backlog that would burst-play once updates resume
            self.playback_cursor = self.playback_cursor.max(now);
            return Advance::Starved { gap };
        }

        let earliest = now + LATENCY;
        if self.playback_cursor < earliest {
            trace!(
                cursor = self.playback_cursor,
                earliest,
                "playback cursor behind latency floor"
            );
            self.playback_cursor = earliest;
        }

        Advance::Ready {
            start_time: self.playback_cursor,
        }
    }

    /// Move the cursor past the block that was just queued.
    pub fn commit(&mut self) {
        self.playback_cursor += BLOCK_DURATION;
    }
}
