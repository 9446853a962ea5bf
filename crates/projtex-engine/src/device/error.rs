/// What the frame loop should do after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface must be (and has been) reconfigured; drop this frame.
    Reconfigured,
    /// Transient failure; drop this frame and try again on the next tick.
    SkipFrame,
    /// Out of memory; stop rendering.
    Fatal,
}

impl SurfaceErrorAction {
    /// Classifies `err` without touching the surface.
    pub fn classify(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigured,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}
