//! Fixed-timestep tick pacing

/// Cap simulation steps per frame to prevent a "spiral of death": if frames
/// get slow the simulation slows down instead of trying to catch up
pub const MAX_STEPS_PER_FRAME: u32 = 2;

/// Accumulates frame time and hands out whole ticks
#[derive(Debug, Clone)]
pub struct TickTimer {
    tick_seconds: f32,
    accumulator: f32,
}

impl TickTimer {
    pub fn new(tick_seconds: f32) -> Self {
        Self {
            tick_seconds: tick_seconds.max(f32::EPSILON),
            accumulator: 0.0,
        }
    }

    pub fn tick_seconds(&self) -> f32 {
        self.tick_seconds
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Add `dt` seconds and return how many ticks to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.tick_seconds && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.tick_seconds;
            steps += 1;
        }

        // Clamp accumulator to prevent runaway
        if self.accumulator > self.tick_seconds * 2.0 {
            self.accumulator = self.tick_seconds;
        }

        steps
    }
}
