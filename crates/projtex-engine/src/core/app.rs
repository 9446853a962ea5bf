use anyhow::Result;
use winit::dpi::PhysicalSize;

use crate::input::KeyEvent;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once per window resize, after the surface has been reconfigured.
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called for every keyboard transition.
    fn on_key(&mut self, event: &KeyEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per render tick.
    ///
    /// Returning `Err` stops the event loop; the error is handed back from
    /// [`Runtime::run`](crate::window::Runtime::run).
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;
}
