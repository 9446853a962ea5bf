/// Device and surface options.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB swapchain format when one exists; otherwise a linear one.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Requested compositing alpha mode; replaced by a supported one if needed.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Requested MSAA sample count.
    ///
    /// Lowered to the largest count the adapter supports for both the
    /// surface and depth formats.
    pub sample_count: u32,

    /// `None` renders without a depth buffer.
    pub depth_format: Option<wgpu::TextureFormat>,

    /// Device creation fails if the adapter lacks any of these.
    pub required_features: wgpu::Features,

    /// Enabled when the adapter offers them, silently skipped otherwise.
    pub optional_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Swapchain latency hint.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            sample_count: 4,
            depth_format: Some(wgpu::TextureFormat::Depth24Plus),
            required_features: wgpu::Features::empty(),
            optional_features: wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
