/// Represents a single acquired frame.
///
/// This object is short-lived and must be finalized promptly. Holding the surface
/// texture prevents acquisition of subsequent frames.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Views a render pass needs to draw into the current frame.
///
/// With multisampling enabled, `color` is the multisampled target and
/// `resolve` the surface view; otherwise `color` is the surface view itself.
#[derive(Copy, Clone)]
pub struct FrameAttachments<'a> {
    pub color: &'a wgpu::TextureView,
    pub resolve: Option<&'a wgpu::TextureView>,
    pub depth: Option<&'a wgpu::TextureView>,
}
