//! Simulation clock - turns continuous elapsed time into whole steps.
//!
//! All times are game-time milliseconds. Each actor kind keeps its own
//! [`StepClock`]: player pieces step slowly, rubble steps fast. The
//! [`PauseClock`] removes paused spans from real time, and the
//! [`SpeedSchedule`] shortens the player step as the game goes on.

use log::info;

use crate::types::{MAX_CATCH_UP_STEPS, MINUTE_MS};

/// Elapsed-time accounting for one actor that moves in fixed steps.
#[derive(Debug, Clone, PartialEq)]
pub struct StepClock {
    step_ms: u64,
    last_step: Option<u64>,
    since_last: u64,
}

impl StepClock {
    pub fn new(step_ms: u64) -> Self {
        Self {
            step_ms: step_ms.max(1),
            last_step: None,
            since_last: 0,
        }
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    pub fn set_step_ms(&mut self, step_ms: u64) {
        self.step_ms = step_ms.max(1);
    }

    /// Record the current time. The first call anchors the clock.
    pub fn on_frame_start(&mut self, now: u64) {
        let last = *self.last_step.get_or_insert(now);
        self.since_last = now.saturating_sub(last);
    }

    pub fn since_last_step(&self) -> u64 {
        self.since_last
    }

    /// Whole steps elapsed since the last step, capped for catch-up.
    pub fn due_steps(&self) -> u32 {
        let steps = self.since_last / self.step_ms;
        steps.min(MAX_CATCH_UP_STEPS as u64) as u32
    }

    /// Mark that the due steps ran at `now`.
    pub fn mark_stepped(&mut self, now: u64) {
        self.last_step = Some(now);
        self.since_last = 0;
    }

    /// Fraction of `transition_ms` elapsed since the last step, in `[0, 1]`.
    pub fn transition_progress(&self, transition_ms: u64) -> f32 {
        if transition_ms == 0 {
            return 1.0;
        }
        (self.since_last as f32 / transition_ms as f32).clamp(0.0, 1.0)
    }
}

/// Maps real time to game time with paused spans removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PauseClock {
    paused_at: Option<u64>,
    total_paused: u64,
}

impl PauseClock {
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Pause or resume at real time `real`.
    pub fn toggle(&mut self, real: u64) {
        match self.paused_at.take() {
            Some(at) => {
                self.total_paused += real.saturating_sub(at);
                info!("unpaused after {}ms", real.saturating_sub(at));
            }
            None => {
                self.paused_at = Some(real);
                info!("paused");
            }
        }
    }

    pub fn total_paused(&self) -> u64 {
        self.total_paused
    }

    /// Game time for `real` ms. Frozen while paused.
    pub fn game_time(&self, real: u64) -> u64 {
        self.paused_at
            .unwrap_or(real)
            .saturating_sub(self.total_paused)
    }
}

/// Geometric speed-up of the player step, once per minute of game time.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSchedule {
    rate_per_minute: f64,
    multiplier: f64,
    last_acceleration: Option<u64>,
}

impl SpeedSchedule {
    pub fn new(rate_per_minute: f64) -> Self {
        Self {
            rate_per_minute,
            multiplier: 1.0,
            last_acceleration: None,
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Apply any acceleration due at `now`; returns true if the speed changed.
    pub fn update(&mut self, now: u64) -> bool {
        let last = *self.last_acceleration.get_or_insert(now);
        if now.saturating_sub(last) < MINUTE_MS {
            return false;
        }
        self.multiplier *= self.rate_per_minute;
        self.last_acceleration = Some(now);
        info!("speed multiplier now {:.3}", self.multiplier);
        true
    }

    /// `base_ms` divided by the current multiplier, at least 1ms.
    pub fn scaled_step_ms(&self, base_ms: u64) -> u64 {
        ((base_ms as f64 / self.multiplier).round() as u64).max(1)
    }
}
