//! Frame clock

use serde::{Deserialize, Serialize};

/// Time value passed to every tick.
///
/// `now_ms` is monotonic host time in milliseconds; durations reported in
/// events (click duration, for instance) are differences of this value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Frame counter, starting at zero
    pub frame: u64,
    /// Host time in milliseconds
    pub now_ms: f64,
}

impl FrameTime {
    #[inline]
    pub const fn new(frame: u64, now_ms: f64) -> Self {
        Self { frame, now_ms }
    }

    /// Advance by one frame of `delta_ms`
    #[inline]
    pub fn advance(self, delta_ms: f64) -> Self {
        Self {
            frame: self.frame + 1,
            now_ms: self.now_ms + delta_ms,
        }
    }

    /// Milliseconds elapsed since `earlier_ms`
    #[inline]
    pub fn since(&self, earlier_ms: f64) -> f64 {
        self.now_ms - earlier_ms
    }
}
