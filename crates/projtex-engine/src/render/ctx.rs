/// Renderer-facing context (device/queue + the formats pipelines must match).
///
/// This is intentionally small and stable.
#[derive(Copy, Clone)]
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub sample_count: u32,
    pub depth_format: Option<wgpu::TextureFormat>,
    pub features: wgpu::Features,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        depth_format: Option<wgpu::TextureFormat>,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            sample_count,
            depth_format,
            features: device.features(),
        }
    }

    /// Multisample state every pipeline drawing into the frame must use.
    pub fn multisample(&self) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: self.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }
}
