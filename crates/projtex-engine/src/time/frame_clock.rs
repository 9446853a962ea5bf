/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Simulated time elapsed since the previous frame tick, in seconds.
    ///
    /// Always `0.0` on the first tick.
    pub dt: f32,

    /// Simulated time at the tick, in seconds.
    pub now: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots from a simulated time source.
///
/// `FrameClock` does not read the wall clock itself: the caller passes the
/// current simulated time (usually [`SimClock::seconds`](super::SimClock::seconds)),
/// which keeps delta-time deterministic under test.
///
/// The first tick reports `dt = 0` so a long startup (shader compilation,
/// window mapping) does not produce a large initial jump.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f32>,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock to `now` (seconds) and returns a new `FrameTime`.
    ///
    /// A time source that goes backwards yields `dt = 0` rather than a negative step.
    pub fn tick(&mut self, now: f32) -> FrameTime {
        let dt = match self.last {
            Some(prev) => (now - prev).max(0.0),
            None => 0.0,
        };
        self.last = Some(now);

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self
            .frame_index
            .wrapping_add(1);

        ft
    }
}
