//! Frame instrumentation seams.
//!
//! Binaries drive the loop through a [`FrameHooks`] value; every method
//! defaults to a no-op, so release builds pay nothing for the seam and
//! diagnostics are a drop-in impl instead of wrappers around the loop.

use std::time::{Duration, Instant};

/// Observer for the per-frame phases of the game loop.
pub trait FrameHooks {
    /// Input sampled, before the update phase runs.
    fn frame_start(&mut self) {}

    /// Frame presented; `elapsed` spans update + draw + present.
    fn frame_end(&mut self, elapsed: Duration) {
        let _ = elapsed;
    }
}

/// The default: measure nothing.
pub struct NoHooks;

impl FrameHooks for NoHooks {}

/// Rolling render-time average printed every few seconds.
pub struct FpsLog {
    window: Duration,
    acc_time: Duration,
    acc_frames: usize,
    last_print: Instant,
}

impl FpsLog {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            acc_time: Duration::ZERO,
            acc_frames: 0,
            last_print: Instant::now(),
        }
    }
}

impl Default for FpsLog {
    fn default() -> Self {
        Self::new(Duration::from_secs(3))
    }
}

impl FrameHooks for FpsLog {
    fn frame_end(&mut self, elapsed: Duration) {
        self.acc_time += elapsed;
        self.acc_frames += 1;

        if self.last_print.elapsed() >= self.window && self.acc_frames > 0 {
            let avg_ms = self.acc_time.as_secs_f64() * 1000.0 / self.acc_frames as f64;
            println!("avg frame: {avg_ms:.2} ms  ({:.1} FPS)", 1000.0 / avg_ms);
            self.acc_time = Duration::ZERO;
            self.acc_frames = 0;
            self.last_print = Instant::now();
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
