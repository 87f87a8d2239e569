use lumen_core::constants::MAX_FRAME_DELTA;

/// Frame loop lifecycle. There is no terminal state; the host ends the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Setup not finished.
    Idle,
    /// Setup finished, no tick yet.
    Armed,
    /// At least one tick has run.
    Running,
}

/// Timing handed to one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Seconds since the previous tick (or since setup for the first tick).
    pub dt: f32,
    /// Seconds since setup.
    pub elapsed: f32,
    /// Zero-based tick index.
    pub frame: u64,
}

/// Converts host timestamps (milliseconds) into per-tick timing.
#[derive(Debug, Clone)]
pub struct FrameClock {
    state: FrameState,
    setup_ms: f64,
    previous_ms: f64,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            state: FrameState::Idle,
            setup_ms: 0.0,
            previous_ms: 0.0,
            frames: 0,
        }
    }

    /// Idle -> Armed. `now_ms` becomes both the setup time and the previous timestamp.
    pub fn arm(&mut self, now_ms: f64) {
        self.state = FrameState::Armed;
        self.setup_ms = now_ms;
        self.previous_ms = now_ms;
        self.frames = 0;
    }

    /// Armed -> Running, Running -> Running.
    ///
    /// Delta time is clamped to [0, MAX_FRAME_DELTA] so a stalled or
    /// backgrounded host does not produce one huge step. Ticking an idle
    /// clock arms it first, giving a zero delta.
    pub fn tick(&mut self, now_ms: f64) -> FrameTiming {
        if self.state == FrameState::Idle {
            self.arm(now_ms);
        }
        let dt = ((now_ms - self.previous_ms) / 1000.0).clamp(0.0, MAX_FRAME_DELTA as f64) as f32;
        let elapsed = ((now_ms - self.setup_ms) / 1000.0).max(0.0) as f32;
        let timing = FrameTiming {
            dt,
            elapsed,
            frame: self.frames,
        };
        // A timestamp going backwards does not move the reference back.
        self.previous_ms = self.previous_ms.max(now_ms);
        self.frames += 1;
        self.state = FrameState::Running;
        timing
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.state(), FrameState::Idle);
        clock.arm(1000.0);
        assert_eq!(clock.state(), FrameState::Armed);
        clock.tick(1016.0);
        assert_eq!(clock.state(), FrameState::Running);
        clock.tick(1032.0);
        assert_eq!(clock.state(), FrameState::Running);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn test_first_delta_measured_from_setup() {
        let mut clock = FrameClock::new();
        clock.arm(500.0);
        let t = clock.tick(516.0);
        assert!((t.dt - 0.016).abs() < 1e-6);
        assert_eq!(t.frame, 0);
        let t = clock.tick(549.0);
        assert!((t.dt - 0.033).abs() < 1e-6);
        assert!((t.elapsed - 0.049).abs() < 1e-6);
        assert_eq!(t.frame, 1);
    }

    #[test]
    fn test_delta_clamped() {
        let mut clock = FrameClock::new();
        clock.arm(0.0);
        assert_eq!(clock.tick(5000.0).dt, MAX_FRAME_DELTA);
        // Backwards timestamp.
        assert_eq!(clock.tick(4000.0).dt, 0.0);
        let t = clock.tick(5010.0);
        assert!((t.dt - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_idle_tick_arms() {
        let mut clock = FrameClock::new();
        let t = clock.tick(1234.0);
        assert_eq!(t.dt, 0.0);
        assert_eq!(t.elapsed, 0.0);
        assert_eq!(clock.state(), FrameState::Running);
    }
}
