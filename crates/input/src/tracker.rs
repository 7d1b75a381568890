//! Press/repeat tracking for game controls.
//!
//! Every press fires its control once, on the next [`ControlTracker::update`].
//! While a repeatable control stays held it fires again each time more than
//! the repeat period has passed since it last fired.
//!
//! Terminals often send no key-release events, so a held control is also
//! released once no press for it has been seen for the release timeout.

use arrayvec::ArrayVec;

use crate::types::{GameControl, KEY_REPEAT_MS};

const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

/// Upper bound on controls emitted by one update.
pub const MAX_CONTROLS_PER_UPDATE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Held {
    last_seen: u64,
    last_fired: u64,
}

#[derive(Debug, Clone)]
pub struct ControlTracker {
    held: [Option<Held>; GameControl::ALL.len()],
    queue: ArrayVec<GameControl, MAX_CONTROLS_PER_UPDATE>,
    repeat_ms: u64,
    release_timeout_ms: u64,
}

fn slot(control: GameControl) -> usize {
    GameControl::ALL
        .iter()
        .position(|&c| c == control)
        .unwrap_or(0)
}

impl ControlTracker {
    pub fn new() -> Self {
        Self::with_repeat_ms(KEY_REPEAT_MS as u64)
    }

    pub fn with_repeat_ms(repeat_ms: u64) -> Self {
        Self {
            held: [None; GameControl::ALL.len()],
            queue: ArrayVec::new(),
            repeat_ms,
            release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_release_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.release_timeout_ms = timeout_ms;
        self
    }

    pub fn release_timeout_ms(&self) -> u64 {
        self.release_timeout_ms
    }

    pub fn is_held(&self, control: GameControl) -> bool {
        self.held[slot(control)].is_some()
    }

    /// Record a press at `now`. A press of an already held control only keeps it held.
    pub fn press(&mut self, control: GameControl, now: u64) {
        match &mut self.held[slot(control)] {
            Some(held) => held.last_seen = now,
            empty => {
                *empty = Some(Held {
                    last_seen: now,
                    last_fired: now,
                });
                let _ = self.queue.try_push(control);
            }
        }
    }

    pub fn release(&mut self, control: GameControl) {
        self.held[slot(control)] = None;
    }

    /// Controls to apply this frame: queued presses first, then repeats.
    pub fn update(&mut self, now: u64) -> ArrayVec<GameControl, MAX_CONTROLS_PER_UPDATE> {
        let mut controls = std::mem::take(&mut self.queue);

        for (idx, entry) in self.held.iter_mut().enumerate() {
            let Some(held) = entry else {
                continue;
            };
            if now.saturating_sub(held.last_seen) > self.release_timeout_ms {
                *entry = None;
                continue;
            }
            let control = GameControl::ALL[idx];
            if !control.is_repeatable() || controls.contains(&control) {
                continue;
            }
            if now.saturating_sub(held.last_fired) > self.repeat_ms {
                held.last_fired = now;
                let _ = controls.try_push(control);
            }
        }

        controls
    }

    pub fn reset(&mut self) {
        self.held = [None; GameControl::ALL.len()];
        self.queue.clear();
    }
}

impl Default for ControlTracker {
    fn default() -> Self {
        Self::new()
    }
}
