//! Time subsystem.
//!
//! Provides stable, testable timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `SimClock` per runtime, pumped on every event-loop wake-up
//! - one `FrameClock` per render loop; call `tick()` with the simulated time
//!   once per presented frame to obtain `FrameTime`

mod frame_clock;
mod sim_clock;

pub use frame_clock::{FrameClock, FrameTime};
pub use sim_clock::SimClock;
