//! Simulation time
//!
//! Fixed tick rate bookkeeping for the scripted scene driver.

use std::time::Duration;

/// Default simulation tick rate (60 Hz = 16.666ms per tick)
pub const TICK_RATE_HZ: u32 = 60;

/// Simulation time tracker
pub struct SimulationTime {
    tick_duration: Duration,
    tick_count: u64,
    accumulated_time: Duration,
}

impl SimulationTime {
    pub fn new() -> Self {
        Self::with_tick_rate(TICK_RATE_HZ)
    }

    /// Create a tracker ticking at `hz` ticks per second. A rate of 0 is
    /// treated as 1 Hz.
    pub fn with_tick_rate(hz: u32) -> Self {
        let hz = hz.max(1);
        Self {
            tick_duration: Duration::from_secs(1) / hz,
            tick_count: 0,
            accumulated_time: Duration::ZERO,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    /// Length of one tick in seconds, as passed to `update(dt)`.
    pub fn tick_seconds(&self) -> f32 {
        self.tick_duration.as_secs_f32()
    }

    pub fn advance_tick(&mut self) {
        self.tick_count += 1;
        self.accumulated_time += self.tick_duration;
    }

    pub fn total_time(&self) -> Duration {
        self.accumulated_time
    }
}

impl Default for SimulationTime {
    fn default() -> Self {
        Self::new()
    }
}
